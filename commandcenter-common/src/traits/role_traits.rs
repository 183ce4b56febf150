// ========================================================
// File: commandcenter-common/src/traits/role_traits.rs
// ========================================================
use async_trait::async_trait;

use crate::models::viewer::{ViewerRoleSet, ViewerSession};

/// Answers "does this viewer hold role R" for the configured broadcaster.
///
/// Every method fails closed: missing identity, missing token or an upstream
/// error all come back as `false`, never as an error.
#[async_trait]
pub trait RoleChecker: Send + Sync {
    async fn is_moderator(&self, user_id: Option<&str>) -> bool;
    async fn is_vip(&self, user_id: Option<&str>) -> bool;
    async fn is_subscriber(&self, user_id: Option<&str>, user_token: Option<&str>) -> bool;

    /// Runs all checks for one page view.
    async fn resolve(&self, session: &ViewerSession) -> ViewerRoleSet;
}
