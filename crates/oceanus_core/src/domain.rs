//! crates/oceanus_core/src/domain.rs
//!
//! Defines the pure, core data structures for the platform.
//! These structs carry no storage or transport concerns beyond their serde shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Roles
//=========================================================================================

/// The closed set of actor roles. Determines route and resource visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Researcher,
    PolicyUser,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Researcher, Role::PolicyUser, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Researcher => "researcher",
            Role::PolicyUser => "policy_user",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Users
//=========================================================================================

/// A registered user. Only `last_login_at` changes after creation.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // Plaintext, compared directly at login. Demo table only.
    pub password: String,
    pub name: String,
    pub role: Role,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// The user fields that are safe to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

//=========================================================================================
// Sessions and tokens
//=========================================================================================

/// The client-held pair of bearer token and identity.
///
/// A `Session` always carries both halves, so "authenticated" is simply
/// "a session exists".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
    pub expires_in: u64,
}

/// The payload carried inside a signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

//=========================================================================================
// Datasets
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    Pending,
    Processing,
    Processed,
    Failed,
}

impl DatasetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Pending => "pending",
            DatasetStatus::Processing => "processing",
            DatasetStatus::Processed => "processed",
            DatasetStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A research dataset as listed by the explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub size: String,
    pub status: DatasetStatus,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<Uuid>,
}

/// The fields a caller supplies when registering a dataset.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub name: String,
    pub kind: String,
    pub location: String,
    pub size: String,
    pub status: DatasetStatus,
    pub metadata: serde_json::Value,
}

/// Explorer filters. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub status: Option<DatasetStatus>,
    pub location: Option<String>,
}

impl DatasetFilter {
    pub fn matches(&self, dataset: &Dataset) -> bool {
        let matches_search = self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            dataset.name.to_lowercase().contains(&term)
                || dataset.location.to_lowercase().contains(&term)
        });
        let matches_kind = self.kind.as_deref().map_or(true, |k| dataset.kind == k);
        let matches_status = self.status.map_or(true, |s| dataset.status == s);
        let matches_location = self
            .location
            .as_deref()
            .map_or(true, |l| dataset.location.contains(l));

        matches_search && matches_kind && matches_status && matches_location
    }
}

//=========================================================================================
// AI analyses
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SpeciesPredict,
    DnaMatch,
}

/// One recorded call to an AI tool.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub kind: AnalysisKind,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesCandidate {
    pub species: String,
    pub common_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesPrediction {
    pub species: String,
    pub common_name: String,
    pub confidence: f64,
    pub alternates: Vec<SpeciesCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaMatch {
    pub species: String,
    pub common_name: String,
    pub similarity: f64,
}

//=========================================================================================
// Taxonomy
//=========================================================================================

/// Leaf level of the taxonomy tree: a family and its species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyNode {
    pub family: String,
    pub species: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNode {
    pub order: String,
    pub children: Vec<FamilyNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassNode {
    pub class: String,
    pub children: Vec<OrderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhylumNode {
    pub phylum: String,
    pub children: Vec<ClassNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTree {
    pub kingdom: String,
    pub children: Vec<PhylumNode>,
}
