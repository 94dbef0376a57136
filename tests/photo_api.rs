//! Upstream proxy and translation tests.

use std::time::Duration;

use photo_gateway::config::PassthroughMode;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

const PHOTO_X1: &str = r#"{"id":"x1","urls":{"regular":"http://img"},"likes":5,"user":{"name":"Ann"}}"#;

#[tokio::test]
async fn test_random_photo_defaults() {
    let (upstream, recorder) = common::start_fixed_upstream(PHOTO_X1).await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/random", gateway))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": "x1",
            "desc": "no desc",
            "alt": "no alt available",
            "url": "http://img",
            "likes": 5,
            "user": { "name": "Ann", "location": null, "bio": "no bio available" }
        })
    );

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target, "/photos/random");
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Client-ID {}", common::API_KEY).as_str())
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_search_first_page() {
    let page = json!({
        "total": 2,
        "total_pages": 1,
        "results": [
            { "id": "a", "urls": { "regular": "http://img/a" }, "likes": 1, "user": { "name": "A" } },
            { "id": "b", "urls": { "regular": "http://img/b" }, "likes": 2, "user": { "name": "B", "bio": "hi" } }
        ]
    })
    .to_string();
    let (upstream, recorder) =
        common::start_upstream(move |_| {
            let page = page.clone();
            async move { (200, page) }
        })
        .await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/search?q=black%20%26%20white", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["totalPages"], json!(1));
    assert_eq!(body["results"][0]["id"], "a");
    assert_eq!(body["results"][1]["user"]["bio"], "hi");

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(
        seen[0].target,
        "/search/photos?query=black+%26+white&page=1&per_page=10"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_search_requires_term() {
    let (upstream, recorder) = common::start_fixed_upstream("{}").await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/search", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(recorder.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_passthrough_translates_with_query() {
    let (upstream, recorder) = common::start_fixed_upstream(PHOTO_X1).await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/unsplash/photos/x1?w=400&fm=jpg", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["desc"], "no desc");
    assert!(body.get("urls").is_none());

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen[0].target, "/photos/x1?w=400&fm=jpg");

    shutdown.trigger();
}

#[tokio::test]
async fn test_passthrough_raw_mode() {
    let (upstream, _) = common::start_fixed_upstream(PHOTO_X1).await;
    let mut config = common::gateway_config(upstream);
    config.upstream.mode = PassthroughMode::Raw;
    let (gateway, shutdown) = common::start_gateway(config).await;

    let res = common::client()
        .get(format!("http://{}/api/unsplash/photos/random", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::from_str::<Value>(PHOTO_X1).unwrap());

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_payload() {
    let (upstream, _) = common::start_upstream(|_| async {
        (401, r#"{"errors":["OAuth error: The access token is invalid"]}"#.to_string())
    })
    .await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/random", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"], json!(["OAuth error: The access token is invalid"]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_upstream_document() {
    let (upstream, _) = common::start_fixed_upstream(r#"{"urls":{"regular":"http://img"}}"#).await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/random", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let correlation_id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["correlationId"], correlation_id.as_str());
    assert!(body["error"].as_str().unwrap().contains("id"));
    assert!(body.get("desc").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_upstream_body() {
    let (upstream, _) = common::start_fixed_upstream("<html>rate limited</html>").await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/api/random", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_timeout() {
    let (upstream, _) = common::start_upstream(|_| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        (200, PHOTO_X1.to_string())
    })
    .await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(upstream)).await;

    let started = std::time::Instant::now();
    let res = common::client()
        .get(format!("http://{}/api/random", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(2));
    let body: Value = res.json().await.unwrap();
    assert!(body["correlationId"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_unreachable() {
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(closed)).await;

    let res = common::client()
        .get(format!("http://{}/api/photos/x1", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}
