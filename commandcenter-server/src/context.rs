//! commandcenter-server/src/context.rs
//!
//! Everything the binary needs wired together once: HTTP client, clock,
//! Twitch configuration, the broadcaster token cache, the role resolver and
//! the catalog snapshots loaded from disk.

use std::sync::Arc;

use tracing::info;

use commandcenter_common::models::Catalog;
use commandcenter_common::traits::RoleChecker;
use commandcenter_core::catalog::load_catalog;
use commandcenter_core::config::{CatalogPaths, TwitchConfig};
use commandcenter_core::platforms::twitch::{BroadcasterTokenCache, TwitchHelixClient};
use commandcenter_core::services::RoleResolver;
use commandcenter_core::{Clock, DefaultHttpClient, Error, HttpClient, SystemClock};

pub struct ServerContext {
    pub config: Arc<TwitchConfig>,
    pub http: Arc<dyn HttpClient>,
    pub roles: Arc<dyn RoleChecker>,
    pub catalog_paths: CatalogPaths,
}

impl ServerContext {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        let http: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::new(http, clock, TwitchConfig::from_env(), CatalogPaths::from_env())
    }

    pub fn new(
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
        config: TwitchConfig,
        catalog_paths: CatalogPaths,
    ) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(BroadcasterTokenCache::new(http.clone(), clock, config.clone()));
        let helix = Arc::new(TwitchHelixClient::new(http.clone(), tokens, config.clone()));
        let roles: Arc<dyn RoleChecker> = Arc::new(RoleResolver::new(helix));

        Self {
            config,
            http,
            roles,
            catalog_paths,
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog, Error> {
        let catalog = load_catalog(&self.catalog_paths)?;
        info!(
            "Loaded catalog: {} commands, {} bits rewards, {} channel-point rewards",
            catalog.commands.len(),
            catalog.bits.len(),
            catalog.points.len()
        );
        Ok(catalog)
    }
}
