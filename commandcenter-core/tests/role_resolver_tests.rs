// tests/role_resolver_tests.rs

use std::sync::Arc;

use commandcenter_common::models::{ViewerRoleSet, ViewerSession};
use commandcenter_common::traits::RoleChecker;
use commandcenter_core::SystemClock;
use commandcenter_core::config::TwitchConfig;
use commandcenter_core::platforms::twitch::{BroadcasterTokenCache, TwitchHelixClient};
use commandcenter_core::services::RoleResolver;
use commandcenter_core::test_utils::ScriptedHttpClient;

const MODS: &str = "/moderation/moderators";
const VIPS: &str = "/channels/vips";
const SUBS: &str = "/subscriptions/user";

fn resolver_with(http: Arc<ScriptedHttpClient>, broadcaster_id: Option<&str>) -> RoleResolver {
    let broadcaster_id = broadcaster_id.map(String::from);
    let config = Arc::new(TwitchConfig::from_lookup(move |k| match k {
        "TWITCH_CLIENT_ID" => Some("cid".into()),
        "TWITCH_CLIENT_SECRET" => Some("secret".into()),
        "TWITCH_BROADCASTER_REFRESH_TOKEN" => Some("long-lived".into()),
        "TWITCH_BROADCASTER_ID" => broadcaster_id.clone(),
        _ => None,
    }));
    let tokens = Arc::new(BroadcasterTokenCache::new(http.clone(), Arc::new(SystemClock), config.clone()));
    let helix = Arc::new(TwitchHelixClient::new(http, tokens, config));
    RoleResolver::new(helix)
}

fn scripted() -> Arc<ScriptedHttpClient> {
    let http = Arc::new(ScriptedHttpClient::new());
    http.respond("/oauth2/token", 200, r#"{"access_token":"bc-token","expires_in":3600}"#);
    http
}

#[tokio::test]
async fn test_empty_data_means_no_role() {
    let http = scripted();
    http.respond(MODS, 200, r#"{"data":[]}"#);
    let resolver = resolver_with(http, Some("100"));

    assert!(!resolver.is_moderator(Some("42")).await);
}

#[tokio::test]
async fn test_non_empty_data_means_role() {
    let http = scripted();
    http.respond(VIPS, 200, r#"{"data":[{"user_id":"42","user_login":"viewer"}]}"#);
    let resolver = resolver_with(http.clone(), Some("100"));

    assert!(resolver.is_vip(Some("42")).await);

    let requests = http.requests();
    let helix = requests.iter().find(|r| r.url.contains(VIPS)).unwrap();
    assert_eq!(
        helix.url,
        "https://api.twitch.tv/helix/channels/vips?broadcaster_id=100&user_id=42"
    );
    assert_eq!(helix.headers.get("Authorization").map(String::as_str), Some("Bearer bc-token"));
    assert_eq!(helix.headers.get("Client-Id").map(String::as_str), Some("cid"));
}

#[tokio::test]
async fn test_upstream_error_fails_closed() {
    let http = scripted();
    http.respond(MODS, 500, "internal error");
    let resolver = resolver_with(http, Some("100"));

    assert!(!resolver.is_moderator(Some("42")).await);
}

#[tokio::test]
async fn test_token_failure_fails_closed() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.respond("/oauth2/token", 400, "bad refresh token");
    http.respond(MODS, 200, r#"{"data":[{"user_id":"42"}]}"#);
    let resolver = resolver_with(http.clone(), Some("100"));

    assert!(!resolver.is_moderator(Some("42")).await);
    assert_eq!(http.count_matching(MODS), 0);
}

#[tokio::test]
async fn test_missing_broadcaster_id_fails_closed() {
    let http = scripted();
    http.respond(MODS, 200, r#"{"data":[{"user_id":"42"}]}"#);
    let resolver = resolver_with(http.clone(), None);

    assert!(!resolver.is_moderator(Some("42")).await);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_subscriber_uses_viewer_token_and_requires_it() {
    let http = scripted();
    http.respond(SUBS, 200, r#"{"data":[{"broadcaster_id":"100","tier":"1000"}]}"#);
    let resolver = resolver_with(http.clone(), Some("100"));

    assert!(!resolver.is_subscriber(Some("42"), None).await);
    assert_eq!(http.count_matching(SUBS), 0);

    assert!(resolver.is_subscriber(Some("42"), Some("viewer-token")).await);
    let requests = http.requests();
    let sub = requests.iter().find(|r| r.url.contains(SUBS)).unwrap();
    assert_eq!(sub.headers.get("Authorization").map(String::as_str), Some("Bearer viewer-token"));
    assert_eq!(http.count_matching("/oauth2/token"), 0);
}

#[tokio::test]
async fn test_resolve_logged_out_is_unresolved() {
    let http = scripted();
    let resolver = resolver_with(http.clone(), Some("100"));

    let roles = resolver.resolve(&ViewerSession::anonymous()).await;
    assert_eq!(roles, ViewerRoleSet::unresolved());
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_resolve_mixes_results_and_marks_resolved() {
    let http = scripted();
    http.respond(MODS, 200, r#"{"data":[{"user_id":"42"}]}"#);
    http.respond(VIPS, 503, "unavailable");
    http.respond(SUBS, 200, r#"{"data":[]}"#);
    let resolver = resolver_with(http, Some("100"));

    let session = ViewerSession {
        twitch_user_id: Some("42".into()),
        access_token: Some("viewer-token".into()),
    };
    let roles = resolver.resolve(&session).await;
    assert_eq!(
        roles,
        ViewerRoleSet {
            is_moderator: true,
            is_vip: false,
            is_subscriber: false,
            resolved: true,
        }
    );
}

#[tokio::test]
async fn test_unusable_token_expiry_fails_closed() {
    let http = Arc::new(ScriptedHttpClient::new());
    http.respond("/oauth2/token", 200, r#"{"access_token":"t","expires_in":9223372036854775807}"#);
    http.respond(MODS, 200, r#"{"data":[{"user_id":"42"}]}"#);
    let resolver = resolver_with(http.clone(), Some("100"));

    assert!(!resolver.is_moderator(Some("42")).await);
    assert_eq!(http.count_matching(MODS), 0);
}
