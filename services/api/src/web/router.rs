//! services/api/src/web/router.rs
//!
//! Assembles the `/api` router: public routes, bearer-protected routes, CORS.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::ConfigError;
use crate::error::ApiResult;
use crate::web::{ai, auth, middleware::require_auth, rest, state::AppState};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(app_state: Arc<AppState>) -> ApiResult<Router> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/dashboard/summary", get(rest::dashboard_summary_handler))
        .route("/api/datasets", get(rest::list_datasets_handler))
        .route("/api/datasets/{id}", get(rest::get_dataset_handler))
        .route("/api/ai/species-predict", post(ai::species_predict_handler))
        .route("/api/ai/dna-match", post(ai::dna_match_handler))
        .route("/api/taxonomy/tree", get(rest::taxonomy_tree_handler))
        .route("/api/health", get(rest::health_handler));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/api/upload", post(rest::upload_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(app_state))
}
