// =============================================================================
// commandcenter-core/src/auth/mod.rs
//   One-off broadcaster authorization: browser -> local callback -> code exchange.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::Error;
use crate::config::TwitchConfig;
use crate::http::HttpClient;
use crate::platforms::twitch::auth::{BroadcasterAuthenticator, BroadcasterGrant};

pub mod callback_server;

pub use callback_server::{CallbackListener, CallbackOutcome};

pub const DEFAULT_CALLBACK_PORT: u16 = 9876;

pub fn callback_redirect_uri(port: u16) -> String {
    format!("http://localhost:{}/callback", port)
}

/// Runs the whole authorization flow. `show_url` receives the URL the
/// operator must open; the call then waits up to `timeout` for the redirect.
pub async fn authorize_broadcaster<F>(
    http: Arc<dyn HttpClient>,
    config: Arc<TwitchConfig>,
    port: u16,
    timeout: Duration,
    show_url: F,
) -> Result<BroadcasterGrant, Error>
where
    F: FnOnce(&str),
{
    let listener = CallbackListener::bind(port)?;
    let redirect_uri = callback_redirect_uri(listener.addr().port());

    let mut authenticator = BroadcasterAuthenticator::new(http, config, redirect_uri);
    let url = authenticator.start_authentication()?;
    show_url(&url);

    match listener.wait(timeout).await? {
        CallbackOutcome::Code { code, state } => {
            info!("Received OAuth callback; exchanging code");
            authenticator.complete_authentication(&code, state.as_deref()).await
        }
        CallbackOutcome::Denied(reason) => Err(Error::Auth(format!("Authorization denied: {}", reason))),
    }
}
