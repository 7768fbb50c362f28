//! services/api/src/web/protocol.rs
//!
//! Defines the JSON bodies exchanged between clients and the API.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use oceanus_core::domain::{
    Dataset, DatasetFilter, DatasetStatus, DnaMatch, PublicUser, Role, SpeciesPrediction,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Authentication
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// The public face of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[schema(value_type = String, example = "researcher")]
    pub role: Role,
}

impl From<PublicUser> for UserView {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

impl From<UserView> for PublicUser {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id,
            email: view.email,
            name: view.name,
            role: view.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub expires_in: u64,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub expires_in: u64,
}

/// The body of every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

//=========================================================================================
// Dashboard and datasets
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecentUpload {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub status: DatasetStatus,
}

impl From<Dataset> for RecentUpload {
    fn from(d: Dataset) -> Self {
        Self {
            id: d.id,
            name: d.name,
            kind: d.kind,
            location: d.location,
            date: d.created_at,
            status: d.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub datasets: usize,
    pub sensors: u32,
    pub edna_samples: u32,
    pub ai_analyses: usize,
    pub recent_uploads: Vec<RecentUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetView {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub size: String,
    #[schema(value_type = String, example = "processed")]
    pub status: DatasetStatus,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<Uuid>,
}

impl From<Dataset> for DatasetView {
    fn from(d: Dataset) -> Self {
        Self {
            id: d.id,
            name: d.name,
            kind: d.kind,
            location: d.location,
            size: d.size,
            status: d.status,
            metadata: d.metadata,
            created_at: d.created_at,
            owner_id: d.owner_id,
        }
    }
}

/// Explorer filters. A missing value or `all` disables a filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DatasetQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
}

impl DatasetQuery {
    /// Converts to a core filter. An unknown status is reported as `Err`.
    pub fn into_filter(self) -> Result<DatasetFilter, String> {
        let status = match active(self.status) {
            Some(s) => Some(
                serde_json::from_value::<DatasetStatus>(serde_json::Value::String(s.clone()))
                    .map_err(|_| format!("Unknown status '{}'", s))?,
            ),
            None => None,
        };
        Ok(DatasetFilter {
            search: active(self.search),
            kind: active(self.kind),
            status,
            location: active(self.location),
        })
    }
}

fn active(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedDataset {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "pending")]
    pub status: DatasetStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub dataset: UploadedDataset,
}

//=========================================================================================
// AI tools
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    #[schema(value_type = Object)]
    pub prediction: SpeciesPrediction,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DnaMatchRequest {
    #[serde(default)]
    pub sequence: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DnaMatchResponse {
    #[schema(value_type = Vec<Object>)]
    pub matches: Vec<DnaMatch>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_defaults_remember_me() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.c","password":"p"}"#).unwrap();
        assert!(!req.remember_me);
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.c","password":"p","rememberMe":true}"#)
                .unwrap();
        assert!(req.remember_me);
    }

    #[test]
    fn dataset_query_treats_all_as_no_filter() {
        let filter = DatasetQuery {
            search: Some("  ".into()),
            kind: Some("all".into()),
            status: Some("pending".into()),
            location: None,
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.search, None);
        assert_eq!(filter.kind, None);
        assert_eq!(filter.status, Some(DatasetStatus::Pending));
    }

    #[test]
    fn dataset_query_rejects_unknown_status() {
        let query = DatasetQuery {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }
}
