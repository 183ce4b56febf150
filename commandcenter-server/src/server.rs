//! commandcenter-server/src/server.rs
//!
//! Read-only JSON endpoints behind the dashboard: role lookups for the current
//! viewer and searches over the loaded catalog.
//!
//! The session layer in front of us forwards the viewer identity as
//! `X-Twitch-User-Id` / `X-Twitch-Access-Token`. A request without them is an
//! anonymous page view.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use commandcenter_common::models::{
    BadgeState, Catalog, ChatCommand, RewardKind, Role, ViewerRoleSet, ViewerSession,
};
use commandcenter_common::traits::RoleChecker;
use commandcenter_core::catalog::snapshot::{BitsRecord, PointsRecord};
use commandcenter_core::catalog::{search_commands, search_rewards};

pub const USER_ID_HEADER: &str = "x-twitch-user-id";
pub const ACCESS_TOKEN_HEADER: &str = "x-twitch-access-token";

#[derive(Clone)]
pub struct AppState {
    pub roles: Arc<dyn RoleChecker>,
    pub catalog: Arc<Catalog>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    pub role: Option<String>,
}

/// One command as the current viewer sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandView<'a> {
    #[serde(flatten)]
    pub command: &'a ChatCommand,
    pub allowed: bool,
    /// False until the viewer's roles have actually been checked.
    pub roles_checked: bool,
    pub badges: Vec<RoleBadge>,
}

#[derive(Debug, Serialize)]
pub struct RoleBadge {
    pub role: Role,
    pub state: BadgeState,
}

impl<'a> CommandView<'a> {
    pub fn new(command: &'a ChatCommand, roles: &ViewerRoleSet) -> Self {
        Self {
            command,
            allowed: command.is_unlocked_for(roles),
            roles_checked: roles.resolved,
            badges: command
                .roles
                .iter()
                .map(|&role| RoleBadge { role, state: roles.badge(role) })
                .collect(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/role/mod", get(role_mod))
        .route("/api/role/vip", get(role_vip))
        .route("/api/role/sub", get(role_sub))
        .route("/api/roles", get(roles))
        .route("/api/catalog/commands", get(catalog_commands))
        .route("/api/catalog/bits", get(catalog_bits))
        .route("/api/catalog/points", get(catalog_points))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    info!("Command Center listening on http://{}", addr);
    axum_server::bind(addr).serve(app.into_make_service()).await?;
    Ok(())
}

pub fn session_from_headers(headers: &HeaderMap) -> ViewerSession {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };
    ViewerSession {
        twitch_user_id: read(USER_ID_HEADER),
        access_token: read(ACCESS_TOKEN_HEADER),
    }
}

// Role answers are per viewer and change without notice.
fn no_store(status: StatusCode, body: impl IntoResponse) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
}

async fn role_mod(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from_headers(&headers);
    let is_mod = state.roles.is_moderator(session.twitch_user_id.as_deref()).await;
    no_store(StatusCode::OK, Json(json!({ "isMod": is_mod })))
}

async fn role_vip(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from_headers(&headers);
    let is_vip = state.roles.is_vip(session.twitch_user_id.as_deref()).await;
    no_store(StatusCode::OK, Json(json!({ "isVip": is_vip })))
}

async fn role_sub(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from_headers(&headers);
    let is_sub = state
        .roles
        .is_subscriber(session.twitch_user_id.as_deref(), session.access_token.as_deref())
        .await;
    no_store(StatusCode::OK, Json(json!({ "isSub": is_sub })))
}

async fn roles(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from_headers(&headers);
    let set = state.roles.resolve(&session).await;
    no_store(StatusCode::OK, Json(set))
}

async fn catalog_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let role = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => return no_store(StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
        },
    };
    let viewer = state.roles.resolve(&session_from_headers(&headers)).await;
    let hits: Vec<CommandView> = search_commands(&state.catalog.commands, &query.q, role)
        .into_iter()
        .map(|c| CommandView::new(c, &viewer))
        .collect();
    no_store(StatusCode::OK, Json(hits))
}

async fn catalog_bits(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Response {
    let hits: Vec<BitsRecord> = search_rewards(state.catalog.rewards(RewardKind::Bits), &query.q)
        .into_iter()
        .map(BitsRecord::from)
        .collect();
    no_store(StatusCode::OK, Json(hits))
}

async fn catalog_points(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Response {
    let hits: Vec<PointsRecord> = search_rewards(state.catalog.rewards(RewardKind::ChannelPoints), &query.q)
        .into_iter()
        .map(PointsRecord::from)
        .collect();
    no_store(StatusCode::OK, Json(hits))
}
