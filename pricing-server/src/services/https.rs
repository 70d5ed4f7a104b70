use crate::core::ServerState;
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::warn!(target: "http_access", latency_ms, "{} {} {}", method, uri, status);
    } else {
        tracing::info!(target: "http_access", latency_ms, "{} {} {}", method, uri, status);
    }

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::pricing::router())
}

/// Build the full application with state and middleware
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}

/// Start the HTTP server and block until `shutdown_signal` resolves
pub async fn start_server<F>(
    state: ServerState,
    port: u16,
    shutdown_signal: F,
) -> Result<(), crate::core::ServerError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Starting HTTP server on {}", addr);

    let handle = axum_server::Handle::new();

    // Handle shutdown signal
    let handle_clone = handle.clone();
    tokio::spawn(async move {
        shutdown_signal.await;
        handle_clone.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
