use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, Environment};
use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Persisted threads
        .merge(thread_routes())
        .merge(tweet_routes())
        // Stateless proxies
        .merge(proxy_routes())
        .with_state(state)
        // Global middleware
        .layer(ServiceBuilder::new().layer(cors).layer(DefaultBodyLimit::max(body_limit)));

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn thread_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::threads;

    Router::new()
        .route("/api/threads", get(threads::thread_list).post(threads::thread_create))
        .route("/api/threads/current", get(threads::current_get).put(threads::current_put))
        .route(
            "/api/threads/:id",
            get(threads::thread_get)
                .put(threads::thread_put)
                .patch(threads::thread_patch)
                .delete(threads::thread_delete),
        )
        .route("/api/threads/:id/publish", post(threads::thread_publish))
        .route("/api/threads/:id/suggestions", post(threads::thread_suggestions))
}

fn tweet_routes() -> Router<AppState> {
    use axum::routing::{delete, patch, post, put};
    use handlers::threads;

    Router::new()
        .route("/api/threads/:id/tweets", post(threads::tweet_add))
        .route(
            "/api/threads/:id/tweets/:tweet_id",
            patch(threads::tweet_update).delete(threads::tweet_remove),
        )
        .route("/api/threads/:id/tweets/:tweet_id/position", put(threads::tweet_reposition))
        .route("/api/threads/:id/tweets/:tweet_id/media", post(threads::media_attach))
        .route(
            "/api/threads/:id/tweets/:tweet_id/media/:media_id",
            delete(threads::media_detach),
        )
}

fn proxy_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::proxy;

    Router::new()
        .route("/api/media", post(proxy::media_upload))
        .route("/api/twitter", post(proxy::twitter_post))
        .route("/api/suggestions", post(proxy::suggestions_post))
        .route("/api/suggestions/prompts", get(proxy::suggestion_prompts))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if matches!(config.environment, Environment::Development)
        || config.security.cors_origins.iter().any(|o| o == "*")
    {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Threadcraft",
            "version": version,
            "description": "Thread composer backend: drafts, media, AI rewrites and publishing to Twitter/X",
            "endpoints": {
                "home": "/",
                "health": "/health",
                "threads": "/api/threads[/:id], /api/threads/current",
                "tweets": "/api/threads/:id/tweets[/:tweet_id[/position]]",
                "media": "/api/threads/:id/tweets/:tweet_id/media[/:media_id]",
                "publish": "/api/threads/:id/publish",
                "thread_suggestions": "/api/threads/:id/suggestions",
                "media_upload": "/api/media",
                "twitter": "/api/twitter",
                "suggestions": "/api/suggestions[/prompts]",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let data_dir = &state.config.storage.data_dir;
    let threads = state.store.list_threads().await.len();

    let storage = match tokio::fs::metadata(data_dir).await {
        Ok(meta) if meta.is_dir() => Ok("ok"),
        Ok(_) => Err(format!("{} is not a directory", data_dir.display())),
        // Created on the first save
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok("empty"),
        Err(e) => Err(e.to_string()),
    };

    match storage {
        Ok(storage) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": storage,
                    "threads": threads,
                    "twitter": state.twitter.is_configured(),
                    "openai": state.suggestions.is_configured(),
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "storage unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "storage_error": e,
                }
            })),
        ),
    }
}
