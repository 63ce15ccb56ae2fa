/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{GatewayError, GatewayResult},
    metrics,
};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    // Browser CCIP-Read clients call the gateway cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .merge(crate::api::routes())
        .fallback(not_found)
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check handler
async fn health_check(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "signer": ctx.signer_address().to_checksum(None),
    }))
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> GatewayResult<Response> {
    let body = metrics::render_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server; returns after Ctrl-C once in-flight requests finish
pub async fn serve(ctx: AppContext) -> GatewayResult<()> {
    let addr = ctx.config.bind_address();

    info!("ENS CCIP-Read gateway listening on {}", addr);
    info!("   Signer address: {}", ctx.signer_address().to_checksum(None));
    info!("   Signature TTL: {}s", ctx.config.service.signature_ttl_secs);

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GatewayError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
