//! HTTP server for the demo query endpoint
//!
//! Routes:
//! - `POST /graphql`: answers the feed query and announces hinted modules as
//!   preload links
//! - `GET /`: the timeline page, rendered through the dispatcher
//! - `GET /healthz`: liveness check

use std::collections::HashSet;
use std::sync::Arc;

use axum::{Json, Router};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use feedsplit_core::{Dispatcher, TypedItem};
use feedsplit_query::{ModuleHint, module_hints};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::page::Timeline;
use crate::source::{FeedSource, encode_response};

/// Shared state for every request
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub source: Arc<dyn FeedSource>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, source: Arc<dyn FeedSource>) -> Self {
        Self { dispatcher, source }
    }
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: String,
}

/// `Link` header values for the hinted modules worth preloading
///
/// A hint is kept when its fragment targets a kind present in `posts`, or when
/// its target is unknown.
pub fn preload_links(hints: &[ModuleHint], posts: &[TypedItem]) -> Vec<String> {
    let present: HashSet<&str> = posts.iter().map(|post| post.kind.as_str()).collect();
    hints
        .iter()
        .filter(|hint| {
            hint.target
                .as_deref()
                .is_none_or(|target| present.contains(target))
        })
        .map(|hint| {
            let module = hint.module.trim_start_matches("./").trim_start_matches('/');
            format!("</{}>; rel=preload; as=script", module)
        })
        .collect()
}

async fn handle_graphql(State(state): State<AppState>, body: Bytes) -> Response {
    let request: QueryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("decode error: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    // A query that fails to parse still gets the feed, just without hints
    let hints = match feedsplit_query::parse(&request.query) {
        Ok(doc) => module_hints(&doc),
        Err(e) => {
            warn!("parser error: {}", e);
            Vec::new()
        }
    };
    if hints.is_empty() {
        debug!("no module hints");
    }

    let posts = match state.source.fetch().await {
        Ok(posts) => posts,
        Err(e) => {
            error!(source = %state.source.describe(), "feed error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let mut response = Json(encode_response(&posts)).into_response();
    for link in preload_links(&hints, &posts) {
        match HeaderValue::from_str(&link) {
            Ok(value) => {
                response.headers_mut().append(header::LINK, value);
            }
            Err(_) => warn!(link = %link, "skipping invalid preload link"),
        }
    }
    response
}

async fn handle_timeline(State(state): State<AppState>) -> Response {
    let posts = match state.source.fetch().await {
        Ok(posts) => posts,
        Err(e) => {
            error!(source = %state.source.describe(), "feed error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let mut page = Timeline::new("feedsplit");
    match state.dispatcher.render_into(&posts, &mut page).await {
        Ok(_) => Html(page.to_html()).into_response(),
        Err(e) => {
            error!("render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn handle_healthz() -> &'static str {
    "ok"
}

/// Build the axum application router
///
/// Separated from `run_server` to enable testing without TCP binding.
pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/graphql", post(handle_graphql))
        .route("/", get(handle_timeline))
        .route("/healthz", get(handle_healthz))
        .with_state(state)
}

/// Run the HTTP server on `127.0.0.1:<port>`
pub async fn run_server(port: u16, state: AppState) -> Result<(), std::io::Error> {
    let app = build_app(state);

    let listener = TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!(port = port, "feedsplit server listening");

    axum::serve(listener, app).await
}
