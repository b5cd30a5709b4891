use std::{env, error::Error, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::request_id::request_id,
    routes::{
        ask::ask_route::ask, course_map::course_map_route::generate_course_map,
        parse_question::parse_question_route::parse_question, search::search_route::search,
        store_course_info::store_course_info_route::store_course_info,
    },
};

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:5000";

pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into());

    let state = AppState::from_env().await?;
    let app = build_router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "course advisor API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Full route set over `state`, with request tracing and `X-Request-Id`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/parse_question", post(parse_question))
        .route("/search", post(search))
        .route("/generate_course_map", get(generate_course_map))
        .route("/store_course_info", post(store_course_info))
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
