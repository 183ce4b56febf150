// File: commandcenter-core/src/platforms/twitch/token_cache.rs

use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use commandcenter_common::models::BroadcasterToken;

use crate::Error;
use crate::clock::Clock;
use crate::config::TwitchConfig;
use crate::http::HttpClient;
use crate::platforms::twitch::requests::token::refresh_access_token;

/// Remaining lifetime below which a cached token is refreshed.
pub const REFRESH_MARGIN_SECS: i64 = 30;

/// Holds at most one broadcaster access token and refreshes it on demand.
///
/// The lock is never held across the refresh request: two callers that both
/// see an expired token will both refresh, and the last one to finish wins.
/// Either token is valid.
pub struct BroadcasterTokenCache {
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    config: Arc<TwitchConfig>,
    cached: Mutex<Option<BroadcasterToken>>,
}

impl BroadcasterTokenCache {
    pub fn new(http: Arc<dyn HttpClient>, clock: Arc<dyn Clock>, config: Arc<TwitchConfig>) -> Self {
        Self {
            http,
            clock,
            config,
            cached: Mutex::new(None),
        }
    }

    /// Returns a bearer token with more than [`REFRESH_MARGIN_SECS`] of life left.
    ///
    /// Only touches the network when the cached token is missing or about to expire.
    pub async fn access_token(&self) -> Result<String, Error> {
        let now = self.clock.now();
        if let Some(token) = self.cached.lock().as_ref() {
            if token.is_fresh(now, Duration::seconds(REFRESH_MARGIN_SECS)) {
                return Ok(token.access_token.clone());
            }
            debug!("Broadcaster token expires within {} s; refreshing", REFRESH_MARGIN_SECS);
        }

        let resp = refresh_access_token(self.http.as_ref(), &self.config).await?;

        if let (Some(new_refresh), Some(current)) = (
            resp.refresh_token.as_deref(),
            self.config.broadcaster_refresh_token.as_ref(),
        ) {
            if new_refresh != current.secret() {
                // Not persisted; the operator has to update the environment.
                warn!("Twitch rotated the broadcaster refresh token; update TWITCH_BROADCASTER_REFRESH_TOKEN");
            }
        }

        let token = BroadcasterToken::new(resp.access_token, now, resp.expires_in)?;
        info!("Broadcaster token refreshed; valid until {}", token.expires_at);
        let access = token.access_token.clone();
        *self.cached.lock() = Some(token);
        Ok(access)
    }

    /// Current cached token, if any, regardless of freshness.
    pub fn cached(&self) -> Option<BroadcasterToken> {
        self.cached.lock().clone()
    }

    /// Forgets the cached token so the next call refreshes.
    pub fn reset(&self) {
        *self.cached.lock() = None;
    }
}
