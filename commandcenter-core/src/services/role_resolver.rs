// ========================================================
// File: commandcenter-core/src/services/role_resolver.rs
// ========================================================
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use commandcenter_common::models::{ViewerRoleSet, ViewerSession};
use commandcenter_common::traits::RoleChecker;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Answers mod/VIP/sub membership for the configured broadcaster.
///
/// Fails closed: whenever a check cannot be completed the answer is `false`.
pub struct RoleResolver {
    helix: Arc<TwitchHelixClient>,
}

impl RoleResolver {
    pub fn new(helix: Arc<TwitchHelixClient>) -> Self {
        Self { helix }
    }

    fn fail_closed(check: &str, result: Result<bool, Error>) -> bool {
        match result {
            Ok(v) => v,
            Err(e) => {
                warn!("{} check failed; treating role as absent: {}", check, e);
                false
            }
        }
    }

    async fn check_moderator(&self, user_id: &str) -> Result<bool, Error> {
        let broadcaster_id = self.helix.config().broadcaster_id()?;
        self.helix.is_channel_moderator(broadcaster_id, user_id).await
    }

    async fn check_vip(&self, user_id: &str) -> Result<bool, Error> {
        let broadcaster_id = self.helix.config().broadcaster_id()?;
        self.helix.is_channel_vip(broadcaster_id, user_id).await
    }

    async fn check_subscriber(&self, user_id: &str, user_token: &str) -> Result<bool, Error> {
        let broadcaster_id = self.helix.config().broadcaster_id()?;
        self.helix.is_channel_subscriber(broadcaster_id, user_id, user_token).await
    }
}

fn present(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

#[async_trait]
impl RoleChecker for RoleResolver {
    async fn is_moderator(&self, user_id: Option<&str>) -> bool {
        let Some(user_id) = present(user_id) else {
            return false;
        };
        Self::fail_closed("moderator", self.check_moderator(user_id).await)
    }

    async fn is_vip(&self, user_id: Option<&str>) -> bool {
        let Some(user_id) = present(user_id) else {
            return false;
        };
        Self::fail_closed("vip", self.check_vip(user_id).await)
    }

    async fn is_subscriber(&self, user_id: Option<&str>, user_token: Option<&str>) -> bool {
        let (Some(user_id), Some(user_token)) = (present(user_id), present(user_token)) else {
            return false;
        };
        Self::fail_closed("subscriber", self.check_subscriber(user_id, user_token).await)
    }

    async fn resolve(&self, session: &ViewerSession) -> ViewerRoleSet {
        if !session.is_logged_in() {
            return ViewerRoleSet::unresolved();
        }
        let user_id = session.twitch_user_id.as_deref();
        let user_token = session.access_token.as_deref();

        let (is_moderator, is_vip, is_subscriber) = tokio::join!(
            self.is_moderator(user_id),
            self.is_vip(user_id),
            self.is_subscriber(user_id, user_token),
        );
        debug!(
            "Resolved roles for user_id={:?}: mod={} vip={} sub={}",
            user_id, is_moderator, is_vip, is_subscriber
        );

        ViewerRoleSet {
            is_moderator,
            is_vip,
            is_subscriber,
            resolved: true,
        }
    }
}
