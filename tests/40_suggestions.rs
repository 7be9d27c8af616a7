mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{spawn_app, Upstreams};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
    }))
}

#[tokio::test]
async fn preset_prompts_are_listed() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = app.get("/api/suggestions/prompts").await;
    assert_eq!(status, StatusCode::OK);
    let prompts = body["data"]["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 5);
    assert_eq!(prompts[0], "Make it more engaging");
}

#[tokio::test]
async fn suggestions_come_back_scored() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .and(body_string_contains("make it shorter"))
        .respond_with(completion(
            r#"{"suggestions":[{"text":"Short.","score":0.9},{"text":"Shorter","score":0.7}]}"#,
        ))
        .expect(1)
        .mount(&openai)
        .await;

    let app = spawn_app(Upstreams {
        twitter: None,
        openai: Some(&openai),
    })
    .await;

    let (status, body) = app
        .post_json(
            "/api/suggestions",
            json!({ "text": "This is a rather long tweet", "prompt": "Make it shorter", "threadContext": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(
        body["data"]["suggestions"],
        json!([{ "text": "Short.", "score": 0.9 }, { "text": "Shorter", "score": 0.7 }])
    );
}

#[tokio::test]
async fn suggestions_without_key_are_unavailable() {
    let app = spawn_app(Upstreams::none()).await;

    let (status, body) = app
        .post_json("/api/suggestions", json!({ "text": "hi", "prompt": "Make it funnier" }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn upstream_error_is_bad_gateway() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&openai)
        .await;

    let app = spawn_app(Upstreams {
        twitter: None,
        openai: Some(&openai),
    })
    .await;

    let (status, body) = app
        .post_json("/api/suggestions", json!({ "text": "hi", "prompt": "Make it funnier" }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to generate suggestions");
    assert!(body["details"].as_str().unwrap().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn thread_suggestions_send_stored_context() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Tweet 1: opening line"))
        .and(body_string_contains("Tweet 2: second thought"))
        .respond_with(completion(r#"[{"text":"A sharper second thought","score":0.8}]"#))
        .expect(1)
        .mount(&openai)
        .await;

    let app = spawn_app(Upstreams {
        twitter: None,
        openai: Some(&openai),
    })
    .await;
    let id = app.create_thread("Context").await;
    app.add_tweet(&id, "opening line").await;
    app.add_tweet(&id, "second thought").await;

    let (status, body) = app
        .post_json(
            &format!("/api/threads/{}/suggestions", id),
            json!({ "text": "second thought", "prompt": "Make it clearer" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["suggestions"][0]["text"], "A sharper second thought");
}
