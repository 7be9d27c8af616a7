mod common;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use common::{send, spawn_app, Upstreams};

#[tokio::test]
async fn health_reports_storage_and_upstreams() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "empty");
    assert_eq!(body["data"]["twitter"], false);
    assert_eq!(body["data"]["openai"], false);

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Threadcraft");
}

#[tokio::test]
async fn create_makes_thread_current() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = app.post_json("/api/threads", json!({ "title": "Launch week" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["title"], "Launch week");
    assert_eq!(body["data"]["tweets"], json!([]));

    let (status, body) = app.get("/api/threads/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (_, body) = app.get("/api/threads").await;
    assert_eq!(body["data"]["currentThreadId"], id.as_str());
    assert_eq!(body["data"]["threads"][0]["tweetCount"], 0);
}

#[tokio::test]
async fn create_without_body_uses_default_title() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = send(
        &app.router,
        common::empty_request(axum::http::Method::POST, "/api/threads"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Untitled Thread");
}

#[tokio::test]
async fn no_current_thread_is_not_found() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = app.get("/api/threads/current").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "No thread selected");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn rename_truncates_to_twenty_characters() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Draft").await;

    let (status, body) = app
        .patch_json(
            &format!("/api/threads/{}", id),
            json!({ "title": "A much longer title than allowed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "A much longer title ");
}

#[tokio::test]
async fn put_replaces_tweets_and_assigns_missing_ids() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Draft").await;
    app.add_tweet(&id, "to be replaced").await;

    let (status, body) = app
        .put_json(
            &format!("/api/threads/{}", id),
            json!({ "tweets": [{ "content": "one" }, { "content": "two" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let tweets = body["data"]["tweets"].as_array().unwrap();
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0]["content"], "one");
    assert!(tweets[1]["id"].as_str().is_some());
}

#[tokio::test]
async fn put_rejects_duplicate_tweet_ids() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Draft").await;
    let tweet_id = uuid::Uuid::new_v4().to_string();

    let (status, body) = app
        .put_json(
            &format!("/api/threads/{}", id),
            json!({ "tweets": [{ "id": tweet_id, "content": "a" }, { "id": tweet_id, "content": "b" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
}

#[tokio::test]
async fn put_measures_media_from_the_payload() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Draft").await;

    // 4096 bytes against a 1024-byte limit, claiming to be 1 byte
    let oversized = json!({
        "tweets": [{
            "content": "pic",
            "media": [{
                "id": uuid::Uuid::new_v4(),
                "fileName": "big.png",
                "mimeType": "image/png",
                "size": 1,
                "sha256": "bogus",
                "data": STANDARD.encode(vec![0u8; 4096]),
            }]
        }]
    });
    let (status, body) = app.put_json(&format!("/api/threads/{}", id), oversized).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{}", body);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");

    let (_, body) = app.get(&format!("/api/threads/{}", id)).await;
    assert_eq!(body["data"]["tweets"], json!([]));

    let media_id = uuid::Uuid::new_v4();
    let small = json!({
        "tweets": [{
            "content": "pic",
            "media": [{
                "id": media_id,
                "fileName": "a.png",
                "mimeType": "image/png",
                "size": 999,
                "sha256": "bogus",
                "data": STANDARD.encode(b"abc"),
            }]
        }]
    });
    let (status, body) = app.put_json(&format!("/api/threads/{}", id), small).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let media = &body["data"]["tweets"][0]["media"][0];
    assert_eq!(media["id"], media_id.to_string());
    assert_eq!(media["size"], 3);
    assert_eq!(
        media["sha256"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[tokio::test]
async fn delete_clears_current_selection() {
    let app = spawn_app(Upstreams::none()).await;
    let first = app.create_thread("First").await;
    let second = app.create_thread("Second").await;

    let (status, _) = app.delete(&format!("/api/threads/{}", second)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get("/api/threads/current").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.put_json("/api/threads/current", json!({ "threadId": first })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "First");
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = spawn_app(Upstreams::none()).await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = app.get(&format!("/api/threads/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.delete(&format!("/api/threads/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put_json("/api/threads/current", json!({ "threadId": missing })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/threads/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Draft").await;

    let request = axum::http::Request::builder()
        .method("PATCH")
        .uri(format!("/api/threads/{}", id))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{ not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn state_survives_restart() {
    let app = spawn_app(Upstreams::none()).await;
    let id = app.create_thread("Persisted").await;
    app.add_tweet(&id, "hello from disk").await;

    let restarted = app.restart().await;
    let (status, body) = send(&restarted, common::empty_request(axum::http::Method::GET, "/api/threads/current")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Persisted");
    assert_eq!(body["data"]["tweets"][0]["content"], "hello from disk");

    let saved = std::fs::read_to_string(app.state.store.file().path()).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["version"], 0);
    assert_eq!(saved["state"]["currentThreadId"], id.as_str());
}
