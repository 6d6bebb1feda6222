pub mod config;
pub mod error;
pub mod extract;
pub mod state;
pub mod middleware;
pub mod routes;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes::{apis, chat, collections, health, logs, prompts, threads};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Stateless comparison
        .route("/chat", post(chat::compare))
        // Threads
        .route(
            "/threads",
            get(threads::list_threads)
                .post(threads::create_thread)
                .delete(threads::delete_all_threads),
        )
        .route("/threads/thread-chat", post(threads::thread_chat))
        .route(
            "/threads/:thread_id",
            get(threads::get_thread).delete(threads::delete_thread),
        )
        .route("/threads/:thread_id/history", get(threads::thread_model_history))
        .route("/thread-history/:thread_id", get(threads::thread_history))
        // Prompts
        .route("/prompts", get(prompts::list_prompts).post(prompts::create_prompt))
        .route(
            "/prompts/:prompt_id",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        // Collections
        .route(
            "/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/collections/:collection_id",
            get(collections::get_collection)
                .put(collections::update_collection)
                .delete(collections::delete_collection),
        )
        .route("/collections/:collection_id/prompts", post(collections::add_prompt))
        .route(
            "/collections/:collection_id/prompts/:prompt_id",
            delete(collections::remove_prompt),
        )
        // API configs
        .route("/apis", get(apis::list_apis).post(apis::add_api))
        .route("/apis/:api_id", axum::routing::put(apis::update_api).delete(apis::delete_api))
        // Conversation logs
        .route("/logs", get(logs::list_log_dates))
        .route("/logs/:date", get(logs::list_logs));
    
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    
    api_routes
        .layer(axum::middleware::from_fn(middleware::logging::log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);
        
        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }
        
        cors
    } else {
        CorsLayer::permissive()
    }
}
