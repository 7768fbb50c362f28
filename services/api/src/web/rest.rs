//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the dashboard, dataset and taxonomy endpoints
//! and the master definition for the OpenAPI specification.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use oceanus_core::domain::{DatasetFilter, DatasetStatus, NewDataset, TaxonomyTree};
use oceanus_core::upload::UploadRequest;
use std::sync::Arc;
use tracing::info;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use uuid::Uuid;

use crate::adapters::fixtures::taxonomy_tree;
use crate::error::{ApiError, ApiResult};
use crate::web::middleware::AuthUser;
use crate::web::protocol::{
    DashboardSummary, DatasetQuery, DatasetView, DnaMatchRequest, DnaMatchResponse,
    HealthResponse, LoginRequest, LoginResponse, MessageBody, PredictionResponse, RecentUpload,
    RefreshResponse, UploadResponse, UploadedDataset, UserView,
};
use crate::web::state::AppState;
use crate::web::{ai, auth};

const SENSOR_COUNT: u32 = 1294;
const EDNA_SAMPLE_COUNT: u32 = 8573;
const RECENT_UPLOADS: usize = 5;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::refresh_handler,
        auth::me_handler,
        dashboard_summary_handler,
        list_datasets_handler,
        get_dataset_handler,
        upload_handler,
        ai::species_predict_handler,
        ai::dna_match_handler,
        taxonomy_tree_handler,
        health_handler,
    ),
    components(
        schemas(
            LoginRequest, LoginResponse, RefreshResponse, UserView, MessageBody,
            DashboardSummary, RecentUpload, DatasetView, UploadResponse, UploadedDataset,
            PredictionResponse, DnaMatchRequest, DnaMatchResponse, HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Oceanus API", description = "Marine research data, AI tools and taxonomy.")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

/// Platform totals and the five most recent uploads.
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses((status = 200, description = "Dashboard summary", body = DashboardSummary))
)]
pub async fn dashboard_summary_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardSummary>> {
    let datasets = state.datasets.list_datasets(&DatasetFilter::default()).await?;
    let ai_analyses = state.analyses.count_analyses().await?;

    let total = datasets.len();
    let recent_uploads = datasets
        .into_iter()
        .skip(total.saturating_sub(RECENT_UPLOADS))
        .map(RecentUpload::from)
        .collect();

    Ok(Json(DashboardSummary {
        datasets: total,
        sensors: SENSOR_COUNT,
        edna_samples: EDNA_SAMPLE_COUNT,
        ai_analyses,
        recent_uploads,
    }))
}

//=========================================================================================
// Datasets
//=========================================================================================

/// Lists datasets in creation order, optionally filtered like the explorer.
#[utoipa::path(
    get,
    path = "/api/datasets",
    params(DatasetQuery),
    responses(
        (status = 200, description = "Matching datasets", body = [DatasetView]),
        (status = 400, description = "Unknown status filter", body = MessageBody)
    )
)]
pub async fn list_datasets_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetQuery>,
) -> ApiResult<Json<Vec<DatasetView>>> {
    let filter = query.into_filter().map_err(ApiError::bad_request)?;
    let datasets = state.datasets.list_datasets(&filter).await?;
    Ok(Json(datasets.into_iter().map(DatasetView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/datasets/{id}",
    params(("id" = String, Path, description = "Dataset id")),
    responses(
        (status = 200, description = "The dataset", body = DatasetView),
        (status = 404, description = "Dataset not found", body = MessageBody)
    )
)]
pub async fn get_dataset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DatasetView>> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Dataset not found"))?;
    let dataset = state.datasets.get_dataset(id).await?;
    Ok(Json(dataset.into()))
}

/// Registers an upload as a `pending` dataset and schedules its processing.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(
        content_type = "application/json",
        description = "Dataset name, type, location, size and metadata."
    ),
    responses(
        (status = 200, description = "Upload accepted", body = UploadResponse),
        (status = 400, description = "Upload failed", body = MessageBody),
        (status = 401, description = "Missing or invalid token", body = MessageBody)
    ),
    security(("bearer" = []))
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(|_| ApiError::bad_request("Upload failed"))?;
    if req.name.trim().is_empty() || req.location.trim().is_empty() {
        return Err(ApiError::bad_request("Upload failed"));
    }

    let dataset = state
        .datasets
        .create_dataset(
            NewDataset {
                name: req.name,
                kind: req.kind,
                location: req.location,
                size: req.size.unwrap_or_else(|| "0 MB".to_string()),
                status: DatasetStatus::Pending,
                metadata: req.metadata.unwrap_or_else(|| serde_json::json!({})),
            },
            Some(user.id),
        )
        .await?;

    info!("User {} uploaded dataset {}", user.id, dataset.id);
    // Detached; the processor logs completion.
    drop(state.processor.schedule(dataset.id));

    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        dataset: UploadedDataset {
            id: dataset.id,
            name: dataset.name,
            status: dataset.status,
        },
    }))
}

//=========================================================================================
// Taxonomy and health
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/taxonomy/tree",
    responses((status = 200, description = "kingdom > phylum > class > order > family > species"))
)]
pub async fn taxonomy_tree_handler() -> Json<TaxonomyTree> {
    Json(taxonomy_tree())
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
