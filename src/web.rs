use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::actions;
use crate::fetch::IgcFetcher;
use crate::track_store::TrackStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: TrackStore,
    pub fetcher: Arc<dyn IgcFetcher>,
    /// Server start, for the uptime report
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: TrackStore, fetcher: Arc<dyn IgcFetcher>) -> Self {
        Self {
            store,
            fetcher,
            started_at: Instant::now(),
        }
    }
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    if status.is_server_error() {
        error!("HTTP {} error on {} {} [{}]", status.as_u16(), method, path, request_id);
    }

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/igcinfo/api", get(actions::get_service_info))
        .route("/igcinfo/api/", get(actions::get_service_info))
        .route(
            "/igcinfo/api/igc",
            get(actions::list_track_ids).post(actions::register_track),
        )
        .route("/igcinfo/api/igc/{id}", get(actions::get_track))
        .route("/igcinfo/api/igc/{id}/{field}", get(actions::get_track_field))
        .fallback(actions::handle_not_found)
        .with_state(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal (Ctrl+C), stopping web server"),
        Err(e) => {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

pub async fn start_web_server(interface: &str, port: u16, state: AppState) -> Result<()> {
    info!("Starting web server on {}:{}", interface, port);

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", interface, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", interface, port))?;
    info!("Web server listening on http://{}:{}", interface, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}
