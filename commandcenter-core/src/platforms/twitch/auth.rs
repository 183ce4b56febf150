use std::fmt;
use std::sync::Arc;

use tracing::debug;
use twitch_oauth2::Scope;
use uuid::Uuid;

use crate::Error;
use crate::config::TwitchConfig;
use crate::http::HttpClient;
use crate::platforms::twitch::requests::token::exchange_code;

/// Result of the one-off broadcaster authorization.
#[derive(Clone)]
pub struct BroadcasterGrant {
    pub access_token: String,
    /// Goes into `TWITCH_BROADCASTER_REFRESH_TOKEN`.
    pub refresh_token: String,
    pub scopes: Vec<String>,
    pub expires_in: i64,
}

impl fmt::Debug for BroadcasterGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcasterGrant")
            .field("scopes", &self.scopes)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Authorization-code flow used once by the operator to mint the
/// broadcaster refresh token the server runs on.
pub struct BroadcasterAuthenticator {
    http: Arc<dyn HttpClient>,
    config: Arc<TwitchConfig>,
    redirect_uri: String,
    pending_state: Option<String>,
}

impl BroadcasterAuthenticator {
    pub fn new(http: Arc<dyn HttpClient>, config: Arc<TwitchConfig>, redirect_uri: impl Into<String>) -> Self {
        Self {
            http,
            config,
            redirect_uri: redirect_uri.into(),
            pending_state: None,
        }
    }

    /// Scopes the broadcaster token needs for the moderator and VIP lookups.
    pub fn scopes() -> Vec<Scope> {
        vec![Scope::ModerationRead, Scope::ChannelReadVips]
    }

    fn build_auth_url(&self, state: &str) -> Result<String, Error> {
        let scope_str = Self::scopes()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.config.authorize_url,
            urlencoding::encode(self.config.client_id()?.as_str()),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scope_str),
            urlencoding::encode(state),
        ))
    }

    /// Returns the URL to open in a browser and remembers the `state` it carries.
    pub fn start_authentication(&mut self) -> Result<String, Error> {
        let state = format!("cc-state-{}", Uuid::new_v4().simple());
        let url = self.build_auth_url(&state)?;
        self.pending_state = Some(state);
        Ok(url)
    }

    pub fn pending_state(&self) -> Option<&str> {
        self.pending_state.as_deref()
    }

    /// Checks the returned `state` and exchanges `code` for tokens.
    pub async fn complete_authentication(
        &mut self,
        code: &str,
        state: Option<&str>,
    ) -> Result<BroadcasterGrant, Error> {
        let expected = self
            .pending_state
            .as_deref()
            .ok_or_else(|| Error::Auth("No authorization in progress".into()))?;
        if state != Some(expected) {
            return Err(Error::Auth("OAuth state mismatch".into()));
        }

        let resp = exchange_code(self.http.as_ref(), &self.config, code, &self.redirect_uri).await?;
        let refresh_token = resp
            .refresh_token
            .ok_or_else(|| Error::Auth("Token endpoint returned no refresh_token".into()))?;

        debug!("Broadcaster authorization complete; scopes={:?}", resp.scope);
        self.pending_state = None;

        Ok(BroadcasterGrant {
            access_token: resp.access_token,
            refresh_token,
            scopes: resp.scope.unwrap_or_default(),
            expires_in: resp.expires_in,
        })
    }
}
