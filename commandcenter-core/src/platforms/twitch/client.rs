// File: commandcenter-core/src/platforms/twitch/client.rs

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::Error;
use crate::config::TwitchConfig;
use crate::http::HttpClient;
use crate::platforms::twitch::token_cache::BroadcasterTokenCache;

/// Authenticated GET wrapper for Helix endpoints.
///
/// Uses the caller's user token when given, otherwise the broadcaster token
/// from [`BroadcasterTokenCache`]. An empty `data` array is a normal result.
pub struct TwitchHelixClient {
    http: Arc<dyn HttpClient>,
    tokens: Arc<BroadcasterTokenCache>,
    config: Arc<TwitchConfig>,
}

impl TwitchHelixClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        tokens: Arc<BroadcasterTokenCache>,
        config: Arc<TwitchConfig>,
    ) -> Self {
        Self { http, tokens, config }
    }

    pub fn config(&self) -> &TwitchConfig {
        &self.config
    }

    /// GET `{helix_url}{path_and_query}` and parse the JSON body.
    ///
    /// `path_and_query` starts with `/`, e.g. `/channels/vips?broadcaster_id=1`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        user_token: Option<&str>,
    ) -> Result<T, Error> {
        let client_id = self.config.client_id()?.as_str().to_string();
        let bearer = match user_token {
            Some(t) => t.to_string(),
            None => self.tokens.access_token().await?,
        };

        let url = format!("{}{}", self.config.helix_url, path_and_query);
        let headers = HashMap::from([
            ("Client-Id".to_string(), client_id),
            ("Authorization".to_string(), format!("Bearer {}", bearer)),
            ("Cache-Control".to_string(), "no-store".to_string()),
        ]);

        let resp = self.http.get(url, headers).await?;
        trace!("helix GET {} => HTTP {}", path_and_query, resp.status);

        if !resp.is_success() {
            warn!("helix GET {} => status={} body={}", path_and_query, resp.status, resp.body);
            return Err(Error::Upstream {
                status: resp.status,
                body: resp.body,
            });
        }

        serde_json::from_str(&resp.body)
            .map_err(|e| Error::Parse(format!("Error parsing Helix JSON for {}: {e}", path_and_query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::http::{HttpResponse, MockHttpClient};
    use serde_json::Value;

    fn config() -> Arc<TwitchConfig> {
        Arc::new(TwitchConfig::from_lookup(|k| match k {
            "TWITCH_CLIENT_ID" => Some("cid".to_string()),
            _ => None,
        }))
    }

    fn client(http: MockHttpClient) -> TwitchHelixClient {
        let http: Arc<dyn HttpClient> = Arc::new(http);
        let cfg = config();
        let tokens = Arc::new(BroadcasterTokenCache::new(http.clone(), Arc::new(SystemClock), cfg.clone()));
        TwitchHelixClient::new(http, tokens, cfg)
    }

    #[tokio::test]
    async fn user_token_skips_broadcaster_refresh() {
        let mut http = MockHttpClient::new();
        http.expect_post_form().never();
        http.expect_get()
            .withf(|url, headers| {
                url == "https://api.twitch.tv/helix/subscriptions/user?broadcaster_id=1&user_id=2"
                    && headers.get("Authorization").map(String::as_str) == Some("Bearer viewer-token")
                    && headers.get("Client-Id").map(String::as_str) == Some("cid")
                    && headers.get("Cache-Control").map(String::as_str) == Some("no-store")
            })
            .times(1)
            .returning(|_, _| Ok(HttpResponse::new(200, r#"{"data":[]}"#)));

        let helix = client(http);
        let v: Value = helix
            .get("/subscriptions/user?broadcaster_id=1&user_id=2", Some("viewer-token"))
            .await
            .unwrap();
        assert_eq!(v["data"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn error_status_carries_status_and_body() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .returning(|_, _| Ok(HttpResponse::new(500, "upstream down")));

        let helix = client(http);
        let err = helix.get::<Value>("/channels/vips", Some("t")).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
        assert!(err.to_string().contains("upstream down"));
    }
}
