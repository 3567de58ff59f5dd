// Taskpool API server
//
// Producer path: HTTP create -> persist (pending) -> bounded queue.
// A fixed worker pool drains the queue and persists terminal statuses.
// SIGINT/SIGTERM stops the listener first, then drains the pool under
// the configured deadline.

mod common;
mod config;
mod services;
mod tasks;
mod validation;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use taskpool_core::{TaskQueue, TaskStore};
use taskpool_storage::Database;
use taskpool_worker::{SimulatedExecutor, WorkerPool, WorkerPoolConfig, WorkerPoolError};

use config::AppConfig;

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

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(tasks::create_task, tasks::list_tasks, tasks::get_task),
    components(schemas(
        tasks::CreateTaskRequest,
        tasks::TaskResponse,
        common::ListResponse<tasks::TaskResponse>,
    )),
    tags(
        (name = "tasks", description = "Task creation and inspection endpoints")
    ),
    info(
        title = "Taskpool API",
        version = "0.2.0",
        description = "API for creating tasks executed asynchronously by a bounded worker pool",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskpool_api=debug,taskpool_worker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("taskpool-api starting...");

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Initialize database
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    let store: Arc<dyn TaskStore> = Arc::new(db);

    // Queue and worker pool
    let queue = TaskQueue::bounded(config.queue_capacity);
    let executor = Arc::new(SimulatedExecutor::default());
    let pool = WorkerPool::new(
        store.clone(),
        executor,
        queue.clone(),
        WorkerPoolConfig::default()
            .with_workers(config.workers)
            .with_shutdown_timeout(config.shutdown_timeout),
    );
    pool.start().context("Failed to start worker pool")?;
    tracing::info!(
        workers = config.workers,
        queue_capacity = config.queue_capacity,
        "Worker pool started"
    );

    // Build router
    let state = tasks::AppState::new(store, queue);
    let app = Router::new()
        .route("/health", get(health))
        .merge(tasks::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The listener has stopped accepting requests; producers are quiesced.
    tracing::info!("HTTP server stopped, draining worker pool");
    match pool.shutdown(config.shutdown_timeout).await {
        Ok(()) => tracing::info!("Graceful shutdown completed"),
        Err(WorkerPoolError::ShutdownTimeout) => {
            tracing::error!("Shutdown deadline exceeded, exiting with tasks still in flight")
        }
        Err(e) => tracing::error!("Worker pool shutdown failed: {}", e),
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Termination signal received");
}
