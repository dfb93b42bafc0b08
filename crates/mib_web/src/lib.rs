use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, Settings};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();
    let static_dir = state.settings.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/upload_and_query", post(handlers::upload_and_query))
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::service_info));

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        // The advertised upload size is informational; any decodable image is analyzed.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState, Settings};
    pub use mib_core::{Error, Result, VisionModel};
}
