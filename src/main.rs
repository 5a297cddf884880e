//! Reminder Bot Backend
//!
//! Serves the bot's commands over HTTP: AI questions answered through an
//! ordered list of fallback models, and reminders, activity logs, message
//! counters and notifications kept in a single JSON file.

mod ai;
mod api;
mod auth;
mod config;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ai::ModelFallbackClient;
use config::Config;
use store::RecordStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub ai: Arc<ModelFallbackClient>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reminder Bot Backend");
    tracing::info!("Data path: {:?}", config.data_path);
    tracing::info!("AI backend: {}", config.ai_base_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (BOT_API_PSK). Authentication is disabled!");
    }

    let store = Arc::new(RecordStore::open(&config.data_path).await?);
    let ai = Arc::new(ModelFallbackClient::new(
        &config.ai_base_url,
        &config.ai_api_key,
    )?);

    // Create application state
    let state = AppState {
        store,
        ai,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // AI
        .route("/ai", post(api::ask_ai))
        // Reminders
        .route(
            "/reminders",
            get(api::list_reminders).post(api::create_reminder),
        )
        .route(
            "/reminders/{id}",
            get(api::get_reminder)
                .patch(api::update_reminder)
                .delete(api::delete_reminder),
        )
        .route("/reminders/{id}/toggle", post(api::toggle_reminder))
        .route("/reminders/{id}/roles", put(api::replace_reminder_roles))
        .route("/reminders/{id}/roles/add", post(api::add_reminder_roles))
        .route(
            "/reminders/{id}/roles/remove",
            post(api::remove_reminder_roles),
        )
        // Activity
        .route("/activity", post(api::log_activity))
        .route("/activity/{user_id}", get(api::get_user_activity))
        // Message counters
        .route("/messages", post(api::count_message))
        .route("/messages/{user_id}", get(api::get_message_count))
        // Leaderboards
        .route("/leaderboard/activity", get(api::activity_leaderboard))
        .route("/leaderboard/messages", get(api::message_leaderboard))
        // Notifications
        .route(
            "/notifications",
            get(api::list_notifications).post(api::create_notification),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
