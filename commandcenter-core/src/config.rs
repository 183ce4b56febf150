// File: commandcenter-core/src/config.rs
//
// Environment-backed configuration. Required Twitch values are only checked
// when first used, so `build-catalog` works without any Twitch setup.

use std::path::{Path, PathBuf};

use twitch_oauth2::{ClientId, ClientSecret, RefreshToken};

use crate::Error;

pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";
pub const ENV_BROADCASTER_ID: &str = "TWITCH_BROADCASTER_ID";
pub const ENV_BROADCASTER_REFRESH_TOKEN: &str = "TWITCH_BROADCASTER_REFRESH_TOKEN";

pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";

/// Twitch application + broadcaster settings.
///
/// `Debug` never prints the secret or refresh token.
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: Option<ClientId>,
    pub client_secret: Option<ClientSecret>,
    pub broadcaster_id: Option<String>,
    pub broadcaster_refresh_token: Option<RefreshToken>,
    pub token_url: String,
    pub authorize_url: String,
    pub helix_url: String,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            broadcaster_id: None,
            broadcaster_refresh_token: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            helix_url: DEFAULT_HELIX_URL.to_string(),
        }
    }
}

impl TwitchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            client_id: get(ENV_CLIENT_ID).map(ClientId::new),
            client_secret: get(ENV_CLIENT_SECRET).map(ClientSecret::new),
            broadcaster_id: get(ENV_BROADCASTER_ID),
            broadcaster_refresh_token: get(ENV_BROADCASTER_REFRESH_TOKEN).map(RefreshToken::new),
            token_url: get("TWITCH_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            authorize_url: get("TWITCH_AUTHORIZE_URL").unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
            helix_url: get("TWITCH_HELIX_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_HELIX_URL.to_string()),
        }
    }

    pub fn client_id(&self) -> Result<&ClientId, Error> {
        self.client_id.as_ref().ok_or_else(|| Error::missing_env(ENV_CLIENT_ID))
    }

    pub fn client_secret(&self) -> Result<&ClientSecret, Error> {
        self.client_secret.as_ref().ok_or_else(|| Error::missing_env(ENV_CLIENT_SECRET))
    }

    pub fn broadcaster_id(&self) -> Result<&str, Error> {
        self.broadcaster_id.as_deref().ok_or_else(|| Error::missing_env(ENV_BROADCASTER_ID))
    }

    pub fn broadcaster_refresh_token(&self) -> Result<&RefreshToken, Error> {
        self.broadcaster_refresh_token
            .as_ref()
            .ok_or_else(|| Error::missing_env(ENV_BROADCASTER_REFRESH_TOKEN))
    }
}

/// How picky the catalog build is about its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Missing columns fall back to defaults.
    #[default]
    Lenient,
    /// Command and Category columns are required and every chat command needs a Category.
    Strict,
}

impl BuildMode {
    pub fn from_env() -> Self {
        match std::env::var("COMMANDCENTER_STRICT_CATALOG") {
            Ok(v) if matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") => BuildMode::Strict,
            _ => BuildMode::Lenient,
        }
    }
}

/// Fixed locations of the catalog input and its three snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub csv: PathBuf,
    pub commands: PathBuf,
    pub bits: PathBuf,
    pub points: PathBuf,
}

impl CatalogPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            csv: dir.join("commands.csv"),
            commands: dir.join("commands.json"),
            bits: dir.join("bits.json"),
            points: dir.join("points.json"),
        }
    }

    /// `$COMMANDCENTER_DATA_DIR`, or `./data`.
    pub fn from_env() -> Self {
        let dir = std::env::var("COMMANDCENTER_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "data".to_string());
        Self::in_dir(dir)
    }
}
