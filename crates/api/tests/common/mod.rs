#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use stride_api::auth::jwt::{generate_access_token, JwtConfig};
use stride_api::config::{ServerConfig, StoreBackend};
use stride_api::router::build_app_router;
use stride_api::services::items::ItemService;
use stride_api::services::link_preview::{LinkPreviewer, PreviewError};
use stride_api::state::AppState;
use stride_core::link_preview::{origin_of, LinkPreview};
use stride_core::types::DbId;
use stride_db::store::MemoryItemStore;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-length";

/// URLs on this host fail to preview, as if the site were down.
pub const UNREACHABLE_HOST: &str = "unreachable.test";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        link_preview_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Answers every preview without touching the network.
///
/// The title is `Preview of <url>` and the favicon sits on the URL origin.
pub struct StubPreviewer;

#[async_trait]
impl LinkPreviewer for StubPreviewer {
    async fn preview(&self, url: &str) -> Result<LinkPreview, PreviewError> {
        if url.contains(UNREACHABLE_HOST) {
            return Err(PreviewError::HttpStatus(503));
        }
        Ok(LinkPreview {
            title: format!("Preview of {url}"),
            favicon: origin_of(url).map(|o| format!("{o}/favicon.ico")),
        })
    }
}

/// The production router over an empty in-memory store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        items: ItemService::new(Arc::new(MemoryItemStore::new()), Arc::new(StubPreviewer)),
    };
    build_app_router(state, &config)
}

pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::GET, uri, Some(&token_for(user)), None).await
}

pub async fn get_anonymous(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(&token_for(user)), Some(body)).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&token_for(user)), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&token_for(user)), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
