// region:    --- Imports
use crate::config::AppConfig;
use crate::handlers;
use crate::store::AuctionStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn AuctionStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
// endregion: --- App State

// region:    --- Router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(handlers::handle_health))
        .route(
            "/active_listing/:id",
            get(handlers::handle_get_listing).post(handlers::handle_place_bid),
        )
        .route("/category/:name", get(handlers::handle_get_category))
        .route("/close_bid", post(handlers::handle_close_bid))
        .route("/comment", post(handlers::handle_comment))
        .route(
            "/create_listing",
            get(handlers::handle_create_listing_form).post(handlers::handle_create_listing),
        )
        .route(
            "/login",
            get(handlers::handle_login_form).post(handlers::handle_login),
        )
        .route("/logout", get(handlers::handle_logout))
        .route(
            "/register",
            get(handlers::handle_register_form).post(handlers::handle_register),
        )
        .route(
            "/watchlist",
            get(handlers::handle_get_watchlist).post(handlers::handle_toggle_watchlist),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
// endregion: --- Router
