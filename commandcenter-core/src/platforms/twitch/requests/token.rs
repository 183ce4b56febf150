// Token endpoint calls: refresh_token grant and authorization_code exchange.
//
// Both POST a form body to `config.token_url` and fail with
// `Error::Upstream { status, body }` on any non-success response.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::Error;
use crate::config::TwitchConfig;
use crate::http::HttpClient;

#[derive(Debug, Clone, Deserialize)]
pub struct TwitchTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<Vec<String>>,
}

async fn post_token_form(
    http: &dyn HttpClient,
    config: &TwitchConfig,
    form: Vec<(String, String)>,
    what: &str,
) -> Result<TwitchTokenResponse, Error> {
    let resp = http.post_form(config.token_url.clone(), form).await?;

    if !resp.is_success() {
        warn!("{} => status={} body={}", what, resp.status, resp.body);
        return Err(Error::Upstream {
            status: resp.status,
            body: resp.body,
        });
    }

    let parsed: TwitchTokenResponse = serde_json::from_str(&resp.body)
        .map_err(|e| Error::Parse(format!("{} parse error on token JSON: {e}", what)))?;
    debug!("{} => new token expires in {} s", what, parsed.expires_in);
    Ok(parsed)
}

/// Exchanges the broadcaster's long-lived refresh token for a fresh access token.
pub async fn refresh_access_token(
    http: &dyn HttpClient,
    config: &TwitchConfig,
) -> Result<TwitchTokenResponse, Error> {
    let form = vec![
        ("client_id".to_string(), config.client_id()?.as_str().to_string()),
        ("client_secret".to_string(), config.client_secret()?.secret().to_string()),
        ("refresh_token".to_string(), config.broadcaster_refresh_token()?.secret().to_string()),
        ("grant_type".to_string(), "refresh_token".to_string()),
    ];
    post_token_form(http, config, form, "refresh_access_token").await
}

/// Exchanges an OAuth authorization `code` for tokens.
pub async fn exchange_code(
    http: &dyn HttpClient,
    config: &TwitchConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<TwitchTokenResponse, Error> {
    let form = vec![
        ("client_id".to_string(), config.client_id()?.as_str().to_string()),
        ("client_secret".to_string(), config.client_secret()?.secret().to_string()),
        ("code".to_string(), code.to_string()),
        ("grant_type".to_string(), "authorization_code".to_string()),
        ("redirect_uri".to_string(), redirect_uri.to_string()),
    ];
    post_token_form(http, config, form, "exchange_code").await
}
