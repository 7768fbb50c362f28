//! services/api/src/web/ai.rs
//!
//! The AI tool endpoints. Both delegate to their port and log the call so the
//! dashboard can count analyses.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use oceanus_core::domain::AnalysisKind;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::web::middleware::authenticate;
use crate::web::protocol::{DnaMatchRequest, DnaMatchResponse, MessageBody, PredictionResponse};
use crate::web::state::AppState;

/// Predicts the species shown in an uploaded image.
///
/// Accepts multipart/form-data with an `image` part.
#[utoipa::path(
    post,
    path = "/api/ai/species-predict",
    request_body(content_type = "multipart/form-data", description = "An `image` part."),
    responses(
        (status = 200, description = "Prediction with alternates", body = PredictionResponse),
        (status = 400, description = "Image required", body = MessageBody)
    )
)]
pub async fn species_predict_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let mut multipart = multipart.map_err(|_| ApiError::bad_request("Image required"))?;
    let mut image: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Image required"))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("Image required"))?;
            image = Some(bytes);
            break;
        }
    }
    let image = image
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ApiError::bad_request("Image required"))?;

    let prediction = state.species.predict_species(&image).await?;
    record(&state, &headers, AnalysisKind::SpeciesPredict).await;

    Ok(Json(PredictionResponse { prediction }))
}

/// Matches a DNA sequence against the reference library.
#[utoipa::path(
    post,
    path = "/api/ai/dna-match",
    request_body = DnaMatchRequest,
    responses(
        (status = 200, description = "Matches by descending similarity", body = DnaMatchResponse),
        (status = 400, description = "DNA sequence required", body = MessageBody)
    )
)]
pub async fn dna_match_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<DnaMatchRequest>, JsonRejection>,
) -> ApiResult<Json<DnaMatchResponse>> {
    let sequence = payload
        .ok()
        .and_then(|Json(req)| req.sequence)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("DNA sequence required"))?;

    let matches = state.dna.match_sequence(&sequence).await?;
    record(&state, &headers, AnalysisKind::DnaMatch).await;

    Ok(Json(DnaMatchResponse { matches }))
}

/// Logs a completed analysis, attributed to the caller when a valid token came along.
async fn record(state: &AppState, headers: &HeaderMap, kind: AnalysisKind) {
    let user_id: Option<Uuid> = authenticate(state, headers).await.ok().map(|u| u.id);
    if let Err(e) = state.analyses.record_analysis(kind, user_id).await {
        warn!("Failed to record {:?} analysis: {}", kind, e);
    }
}
