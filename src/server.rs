//! HTTP server for the live dashboard
//!
//! Two routes:
//! - `GET /` returns the page, rendered once at startup
//! - `POST /_update` runs the callback for one selection change

use crate::callbacks::{Dispatcher, UpdateRequest, UpdateResponse};
use crate::context::AppContext;
use crate::error::Result;
use crate::html::{generate_dashboard, DashboardConfig, RenderMode};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Read-only state shared by all requests
#[derive(Debug)]
pub struct AppState {
    context: AppContext,
    dispatcher: Dispatcher,
    page: String,
}

impl AppState {
    /// Render the page up front; nothing changes after startup
    pub fn new(
        context: AppContext,
        dispatcher: Dispatcher,
        config: &DashboardConfig,
    ) -> Result<Self> {
        let page = generate_dashboard(&context, &dispatcher, config, RenderMode::Live)?;
        Ok(Self {
            context,
            dispatcher,
            page,
        })
    }
}

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/_update", post(update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard until Ctrl+C
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard running at http://{}/", listener.local_addr()?);

    axum::serve(listener, create_router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> std::result::Result<Json<UpdateResponse>, (StatusCode, String)> {
    state
        .dispatcher
        .dispatch(&state.context, &request)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}
