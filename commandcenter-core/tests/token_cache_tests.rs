// tests/token_cache_tests.rs

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use commandcenter_core::Error;
use commandcenter_core::config::TwitchConfig;
use commandcenter_core::platforms::twitch::BroadcasterTokenCache;
use commandcenter_core::test_utils::{ManualClock, ScriptedHttpClient};

const TOKEN_PATH: &str = "/oauth2/token";

fn config() -> Arc<TwitchConfig> {
    Arc::new(TwitchConfig::from_lookup(|k| match k {
        "TWITCH_CLIENT_ID" => Some("cid".into()),
        "TWITCH_CLIENT_SECRET" => Some("secret".into()),
        "TWITCH_BROADCASTER_REFRESH_TOKEN" => Some("long-lived".into()),
        _ => None,
    }))
}

fn setup() -> (Arc<ScriptedHttpClient>, Arc<ManualClock>, BroadcasterTokenCache) {
    let http = Arc::new(ScriptedHttpClient::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap()));
    let cache = BroadcasterTokenCache::new(http.clone(), clock.clone(), config());
    (http, clock, cache)
}

#[tokio::test]
async fn test_cached_token_is_reused_without_network() -> Result<(), Error> {
    let (http, clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"first","expires_in":3600}"#);

    let a = cache.access_token().await?;
    clock.advance(Duration::seconds(10));
    let b = cache.access_token().await?;

    assert_eq!(a, "first");
    assert_eq!(a, b);
    assert_eq!(http.count_matching(TOKEN_PATH), 1);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_triggers_exactly_one_refresh() -> Result<(), Error> {
    let (http, clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"first","expires_in":3600}"#);
    cache.access_token().await?;

    http.respond(TOKEN_PATH, 200, r#"{"access_token":"second","expires_in":3600}"#);
    clock.advance(Duration::seconds(3601));

    assert_eq!(cache.access_token().await?, "second");
    assert_eq!(cache.access_token().await?, "second");
    assert_eq!(http.count_matching(TOKEN_PATH), 2);
    Ok(())
}

#[tokio::test]
async fn test_token_inside_safety_margin_is_refreshed() -> Result<(), Error> {
    let (http, clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"first","expires_in":100}"#);
    cache.access_token().await?;

    // 29 s of life left: below the 30 s margin.
    clock.advance(Duration::seconds(71));
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"second","expires_in":100}"#);

    assert_eq!(cache.access_token().await?, "second");
    assert_eq!(http.count_matching(TOKEN_PATH), 2);
    Ok(())
}

#[tokio::test]
async fn test_refresh_request_shape() -> Result<(), Error> {
    let (http, _clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"t","expires_in":60}"#);
    cache.access_token().await?;

    let requests = http.requests();
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.url, "https://id.twitch.tv/oauth2/token");
    for pair in [
        ("client_id", "cid"),
        ("client_secret", "secret"),
        ("refresh_token", "long-lived"),
        ("grant_type", "refresh_token"),
    ] {
        assert!(
            req.form.contains(&(pair.0.to_string(), pair.1.to_string())),
            "missing form field {:?}",
            pair
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_returns_status_and_keeps_no_token() {
    let (http, _clock, cache) = setup();
    http.respond(TOKEN_PATH, 401, "invalid client");

    let err = cache.access_token().await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(401));
    assert!(err.to_string().contains("invalid client"));
    assert!(cache.cached().is_none());
}

#[tokio::test]
async fn test_reset_forces_refresh() -> Result<(), Error> {
    let (http, _clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"t","expires_in":3600,"refresh_token":"rotated"}"#);

    cache.access_token().await?;
    assert!(cache.cached().is_some());
    cache.reset();
    assert!(cache.cached().is_none());
    cache.access_token().await?;
    assert_eq!(http.count_matching(TOKEN_PATH), 2);
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_expiry_is_an_error_not_a_panic() {
    let (http, _clock, cache) = setup();
    http.respond(TOKEN_PATH, 200, r#"{"access_token":"t","expires_in":9223372036854775807}"#);

    let err = cache.access_token().await.unwrap_err();
    assert!(matches!(err, Error::Parse(ref m) if m.contains("expires_in")));
    assert!(cache.cached().is_none());
}
