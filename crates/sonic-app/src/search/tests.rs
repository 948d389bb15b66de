//! Search gateway tests against an in-process mock provider.
//!
//! Every test spins up its own axum server on an ephemeral port and points
//! the gateway at it, so no test touches the real API.

use super::*;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use sonic_proto::config::SearchConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

struct MockProvider {
    hits: Mutex<Vec<HashMap<String, String>>>,
    status: u16,
    body: Value,
}

impl MockProvider {
    fn hits(&self) -> Vec<HashMap<String, String>> {
        self.hits.lock().unwrap().clone()
    }
}

async fn mock_search(
    State(mock): State<Arc<MockProvider>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    mock.hits.lock().unwrap().push(params);
    (
        StatusCode::from_u16(mock.status).unwrap(),
        Json(mock.body.clone()),
    )
}

async fn spawn_provider(status: u16, body: Value) -> (String, Arc<MockProvider>) {
    let mock = Arc::new(MockProvider {
        hits: Mutex::new(Vec::new()),
        status,
        body,
    });
    let app = Router::new()
        .route("/youtube/v3/search", get(mock_search))
        .with_state(Arc::clone(&mock));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/youtube/v3/search", addr), mock)
}

/// Gateway wired to `endpoint`, with its key in a per-test env var so tests
/// running in parallel never see each other's credentials.
fn youtube_gateway(endpoint: &str, key_env: &str, key: Option<&str>) -> SearchGateway {
    match key {
        Some(k) => std::env::set_var(key_env, k),
        None => std::env::remove_var(key_env),
    }
    let config = SearchConfig {
        endpoint: endpoint.to_string(),
        api_key_env: key_env.to_string(),
        ..SearchConfig::default()
    };
    SearchGateway::from_config(&config).unwrap()
}

fn item(video_id: &str, title: &str, channel: &str, high: Option<&str>, default: &str) -> Value {
    let mut thumbnails = json!({ "default": { "url": default } });
    if let Some(url) = high {
        thumbnails["high"] = json!({ "url": url });
    }
    json!({
        "kind": "youtube#searchResult",
        "id": { "kind": "youtube#video", "videoId": video_id },
        "snippet": {
            "title": title,
            "channelTitle": channel,
            "thumbnails": thumbnails
        }
    })
}

fn two_items() -> Value {
    json!({
        "kind": "youtube#searchListResponse",
        "items": [
            item("oica5jG7FpU", "The Thrill Is Gone", "BB King", Some("https://i.ytimg.com/vi/oica5jG7FpU/hqdefault.jpg"), "https://i.ytimg.com/vi/oica5jG7FpU/default.jpg"),
            item("dkftesK2dck", "Sweet Home Chicago", "Robert Johnson - Topic", Some("https://i.ytimg.com/vi/dkftesK2dck/hqdefault.jpg"), "https://i.ytimg.com/vi/dkftesK2dck/default.jpg"),
        ]
    })
}

#[tokio::test]
async fn test_blank_query_skips_provider() {
    let (endpoint, mock) = spawn_provider(200, two_items()).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_BLANK", Some("k"));

    assert!(gateway.search("").await.unwrap().is_empty());
    assert!(gateway.search("   \t").await.unwrap().is_empty());
    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn test_maps_items_in_provider_order() {
    let (endpoint, mock) = spawn_provider(200, two_items()).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_MAP", Some("secret-key"));

    let tracks = gateway.search("blues").await.unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].id, "oica5jG7FpU");
    assert_eq!(tracks[0].youtube_id.as_deref(), Some("oica5jG7FpU"));
    assert_eq!(tracks[0].title, "The Thrill Is Gone");
    assert_eq!(tracks[0].artist, "BB King");
    assert_eq!(
        tracks[0].album_cover_url,
        "https://i.ytimg.com/vi/oica5jG7FpU/hqdefault.jpg"
    );
    assert!(tracks[0].audio_url.is_none());
    assert_eq!(tracks[1].id, "dkftesK2dck");
    assert_eq!(tracks[1].artist, "Robert Johnson - Topic");

    let hits = mock.hits();
    assert_eq!(hits.len(), 1);
    let params = &hits[0];
    assert_eq!(params["part"], "snippet");
    assert_eq!(params["maxResults"], "10");
    assert_eq!(params["q"], "blues music");
    assert_eq!(params["type"], "video");
    assert_eq!(params["key"], "secret-key");
}

#[tokio::test]
async fn test_query_is_trimmed_before_sending() {
    let (endpoint, mock) = spawn_provider(200, two_items()).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_TRIM", Some("k"));

    gateway.search("  delta blues ").await.unwrap();
    assert_eq!(mock.hits()[0]["q"], "delta blues music");
}

#[tokio::test]
async fn test_cover_falls_back_to_default_thumbnail() {
    let body = json!({
        "items": [item("abc", "Low Res", "Someone", None, "https://i.ytimg.com/vi/abc/default.jpg")]
    });
    let (endpoint, _mock) = spawn_provider(200, body).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_THUMB", Some("k"));

    let tracks = gateway.search("low").await.unwrap();
    assert_eq!(tracks[0].album_cover_url, "https://i.ytimg.com/vi/abc/default.jpg");
}

#[tokio::test]
async fn test_provider_error_is_reported() {
    let body = json!({
        "error": {
            "code": 403,
            "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{ "reason": "quotaExceeded" }]
        }
    });
    let (endpoint, mock) = spawn_provider(403, body).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_ERR", Some("k"));

    let err = gateway.search("blues").await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::Reported {
            code: Some(403),
            message: "The request cannot be completed because you have exceeded your quota."
                .to_string(),
        }
    );
    assert_eq!(mock.hits().len(), 1);
}

#[tokio::test]
async fn test_missing_items_is_no_results() {
    let (endpoint, _mock) = spawn_provider(200, json!({ "kind": "youtube#searchListResponse" })).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_NOITEMS", Some("k"));

    assert_eq!(
        gateway.search("blues").await.unwrap_err(),
        ProviderError::NoResults
    );
}

#[tokio::test]
async fn test_item_missing_required_field_is_malformed() {
    let body = json!({
        "items": [{
            "id": { "videoId": "abc" },
            "snippet": { "channelTitle": "No Title", "thumbnails": {} }
        }]
    });
    let (endpoint, _mock) = spawn_provider(200, body).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_MALFORMED", Some("k"));

    assert!(matches!(
        gateway.search("blues").await,
        Err(ProviderError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_item_without_any_thumbnail_is_malformed() {
    let body = json!({
        "items": [{
            "id": { "videoId": "abc" },
            "snippet": { "title": "T", "channelTitle": "C", "thumbnails": {} }
        }]
    });
    let (endpoint, _mock) = spawn_provider(200, body).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_NOTHUMB", Some("k"));

    match gateway.search("blues").await {
        Err(ProviderError::Malformed(msg)) => assert!(msg.contains("abc")),
        other => panic!("Expected malformed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_credential_fails_at_call_time() {
    let (endpoint, mock) = spawn_provider(200, two_items()).await;
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_UNSET", None);

    assert_eq!(
        gateway.search("blues").await.unwrap_err(),
        ProviderError::MissingCredential("SONIC_TEST_KEY_UNSET".to_string())
    );
    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = format!("http://{}/youtube/v3/search", addr);
    let gateway = youtube_gateway(&endpoint, "SONIC_TEST_KEY_TRANSPORT", Some("k"));

    match gateway.search("blues").await {
        Err(ProviderError::Transport(msg)) => assert!(!msg.contains("key=")),
        other => panic!("Expected transport error, got {:?}", other),
    }
}

#[test]
fn test_non_json_error_status() {
    assert_eq!(
        youtube::parse_search_response(502, b"<html>Bad Gateway</html>"),
        Err(ProviderError::Status(502))
    );
    assert!(matches!(
        youtube::parse_search_response(200, b"not json"),
        Err(ProviderError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_fixture_provider_filters_title_and_artist() {
    let config = SearchConfig {
        provider: sonic_proto::config::ProviderKind::Fixture,
        ..SearchConfig::default()
    };
    let gateway = SearchGateway::from_config(&config).unwrap();
    assert_eq!(gateway.provider_name(), "fixture");

    let by_artist = gateway.search("KING").await.unwrap();
    assert_eq!(by_artist.len(), 1);
    assert_eq!(by_artist[0].title, "The Thrill Is Gone");

    let by_title = gateway.search("chicago").await.unwrap();
    assert_eq!(by_title[0].artist, "Robert Johnson");

    assert!(gateway.search("polka").await.unwrap().is_empty());
    assert!(gateway.search(" ").await.unwrap().is_empty());
}

#[test]
fn test_fixture_search_respects_limit() {
    let fixture = fixture::FixtureSearch::new(fixtures::search_tracks(), 1);
    // both fixture tracks contain an "e"
    assert_eq!(fixture.search("e").len(), 1);
}
