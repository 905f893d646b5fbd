//! HTTP server.
//!
//! An axum router over the task store. All `/api/tasks*` routes require a
//! session (see [`crate::auth::CurrentUser`]); every handler touches only the
//! signed-in user's tasks.

mod auth_routes;
mod task_routes;

pub use auth_routes::session_cookie;
pub use task_routes::{TaskListResponse, TaskQuery};

use crate::config::Config;
use crate::db::Database;
use crate::views::{Clock, DueDateClassifier, SystemClock};
use axum::{Json, Router, routing::get};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Arc<Config>) -> Self {
        Self {
            db,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, for tests that need a fixed "now".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn classifier(&self) -> DueDateClassifier {
        DueDateClassifier::new(self.config.tasks.due_soon_days)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ApiIndex {
    name: &'static str,
    version: &'static str,
    endpoints: &'static [&'static str],
}

async fn api_root() -> Json<ApiIndex> {
    Json(ApiIndex {
        name: "taskpad",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: &[
            "GET /api/health",
            "POST /api/auth/register",
            "POST /api/auth/login",
            "POST /api/auth/logout",
            "GET /api/auth/session",
            "GET /api/tasks",
            "POST /api/tasks",
            "GET /api/tasks/stats",
            "GET /api/tasks/{id}",
            "PUT /api/tasks/{id}",
            "PATCH /api/tasks/{id}",
            "DELETE /api/tasks/{id}",
        ],
    })
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(api_root))
        .route("/api/health", get(health))
        .merge(auth_routes::routes())
        .merge(task_routes::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address actually bound (useful with port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind `addr` and serve in the background.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
