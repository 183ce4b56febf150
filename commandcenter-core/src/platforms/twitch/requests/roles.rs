//! Helix membership lookups for a single viewer:
//!  - GET /moderation/moderators   (broadcaster token, `moderation:read`)
//!  - GET /channels/vips           (broadcaster token, `channel:read:vips`)
//!  - GET /subscriptions/user      (viewer token, `user:read:subscriptions`)
//!
//! Each asks for one `user_id`; a non-empty `data` array means "is a member".

use serde::Deserialize;
use serde_json::Value;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Generic `{ "data": [...] }` envelope. A missing `data` counts as empty.
#[derive(Debug, Deserialize)]
pub struct HelixListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn membership_query(path: &str, broadcaster_id: &str, user_id: &str) -> String {
    format!(
        "{}?broadcaster_id={}&user_id={}",
        path,
        urlencoding::encode(broadcaster_id),
        urlencoding::encode(user_id)
    )
}

impl TwitchHelixClient {
    async fn has_rows(&self, path_and_query: &str, user_token: Option<&str>) -> Result<bool, Error> {
        let resp: HelixListResponse<Value> = self.get(path_and_query, user_token).await?;
        Ok(!resp.data.is_empty())
    }

    pub async fn is_channel_moderator(&self, broadcaster_id: &str, user_id: &str) -> Result<bool, Error> {
        self.has_rows(&membership_query("/moderation/moderators", broadcaster_id, user_id), None)
            .await
    }

    pub async fn is_channel_vip(&self, broadcaster_id: &str, user_id: &str) -> Result<bool, Error> {
        self.has_rows(&membership_query("/channels/vips", broadcaster_id, user_id), None)
            .await
    }

    /// Needs the viewer's own token; the broadcaster token cannot answer this.
    pub async fn is_channel_subscriber(
        &self,
        broadcaster_id: &str,
        user_id: &str,
        user_token: &str,
    ) -> Result<bool, Error> {
        self.has_rows(
            &membership_query("/subscriptions/user", broadcaster_id, user_id),
            Some(user_token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_encoded() {
        assert_eq!(
            membership_query("/channels/vips", "123", "a b&c"),
            "/channels/vips?broadcaster_id=123&user_id=a%20b%26c"
        );
    }

    #[test]
    fn missing_data_is_empty() {
        let resp: HelixListResponse<Value> = serde_json::from_str("{}").unwrap();
        assert!(resp.data.is_empty());
    }
}
