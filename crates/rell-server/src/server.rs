//! HTTP server using Axum.
//!
//! Every context route parses its own request: query parameters for `GET`,
//! the url-encoded body for `POST` (hidden form fields carrying
//! [`Context::values`](rell_context::Context::values)).

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Form, Router,
    extract::{Query, State, rejection::FormRejection},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use rell_context::{ContextParser, Resolution, Scheme};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, info_span, warn};

use crate::error::ServerError;
use crate::view::{ContextView, DEFAULT_PATH, EnvironmentsView};

/// Request key naming the page the synthesized links point at.
const PATH_KEY: &str = "path";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Allow cross-origin reads of the JSON endpoints
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            hostname: "127.0.0.1".into(),
            enable_cors: false,
        }
    }
}

/// Shared state for the HTTP handlers.
struct AppState {
    parser: ContextParser,
    /// Requests served (for health check)
    request_count: AtomicU64,
}

/// The HTTP server — owns the listener task and its shutdown signal.
pub struct HttpServer {
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Actual bound port
    port: u16,
}

impl HttpServer {
    /// Bind and start serving with the given parser.
    pub async fn start(config: ServerConfig, parser: ContextParser) -> Result<Self, ServerError> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let state = Arc::new(AppState {
            parser,
            request_count: AtomicU64::new(0),
        });

        let app = router(state, config.enable_cors);

        let addr_str = format!("{}:{}", config.hostname, config.port);
        let addr: SocketAddr = addr_str.parse().map_err(|source| ServerError::InvalidAddress {
            addr: addr_str.clone(),
            source,
        })?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr_str.clone(),
                source,
            })?;
        let actual_port = listener.local_addr()?.port();

        info!("Rell listening on http://{}:{}", config.hostname, actual_port);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gracefully stop the server.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Rell server stopped");
    }
}

fn router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/context", get(context_query_handler).post(context_form_handler))
        .route("/environments", get(environments_handler))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "requests": state.request_count.load(Ordering::Relaxed),
    }))
}

async fn context_query_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    context_response(&state, &headers, &pairs)
}

async fn context_form_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    match form {
        Ok(Form(pairs)) => context_response(&state, &headers, &pairs).into_response(),
        Err(rejection) => {
            warn!("Rejected context form: {rejection}");
            rejection.into_response()
        }
    }
}

async fn environments_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let resolution = resolve(&state, &headers, &pairs);
    Json(EnvironmentsView::new(&resolution.context, requested_path(&pairs)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn context_response(state: &AppState, headers: &HeaderMap, pairs: &[(String, String)]) -> Json<ContextView> {
    let resolution = resolve(state, headers, pairs);
    Json(ContextView::new(&resolution, requested_path(pairs)))
}

fn resolve(state: &AppState, headers: &HeaderMap, pairs: &[(String, String)]) -> Resolution {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let request_id = uuid::Uuid::new_v4().to_string();
    let _span = info_span!("context", %request_id).entered();

    let mut resolution = state.parser.resolve(pairs.iter().map(|(k, v)| (k, v)));
    resolution.context = resolution.context.with_scheme(request_scheme(headers));
    debug!(
        env = %resolution.context.env(),
        view_mode = %resolution.context.view_mode(),
        fallbacks = resolution.fallbacks.len(),
        "resolved request context"
    );
    resolution
}

fn requested_path(pairs: &[(String, String)]) -> &str {
    pairs
        .iter()
        .find(|(k, _)| k == PATH_KEY)
        .map(|(_, v)| v.as_str())
        .unwrap_or(DEFAULT_PATH)
}

/// Scheme the client used, honouring a TLS-terminating proxy.
fn request_scheme(headers: &HeaderMap) -> Scheme {
    match headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => Scheme::Https,
        _ => Scheme::Http,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn forwarded_proto_selects_https() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_scheme(&headers), Scheme::Http);
        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS"));
        assert_eq!(request_scheme(&headers), Scheme::Https);
    }

    #[test]
    fn path_defaults_to_root() {
        let pairs = vec![("server".to_string(), "beta".to_string())];
        assert_eq!(requested_path(&pairs), "/");
        let pairs = vec![("path".to_string(), "/examples/".to_string())];
        assert_eq!(requested_path(&pairs), "/examples/");
    }

    #[test]
    fn resolve_counts_requests_and_applies_scheme() {
        let state = AppState {
            parser: ContextParser::default(),
            request_count: AtomicU64::new(0),
        };
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        let pairs = vec![("appid".to_string(), "oops".to_string())];

        let resolution = resolve(&state, &headers, &pairs);
        assert_eq!(resolution.context.scheme(), Scheme::Https);
        assert_eq!(resolution.fallbacks.len(), 1);
        assert_eq!(state.request_count.load(Ordering::Relaxed), 1);
    }
}
