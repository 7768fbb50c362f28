//! crates/oceanus_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the platform's core logic.
//! Adapters in the `api` service implement these; the core never sees a concrete store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AnalysisKind, Dataset, DatasetFilter, DatasetStatus, DnaMatch, NewDataset, Session,
    SpeciesPrediction, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The first three variants are the caller-facing failure taxonomy; `Unexpected`
/// covers everything the caller cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<User>;

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> PortResult<()>;
}

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Returns datasets in creation order.
    async fn list_datasets(&self, filter: &DatasetFilter) -> PortResult<Vec<Dataset>>;

    async fn get_dataset(&self, dataset_id: Uuid) -> PortResult<Dataset>;

    async fn create_dataset(&self, dataset: NewDataset, owner_id: Option<Uuid>)
        -> PortResult<Dataset>;

    /// Moves a dataset from `from` to `to`. Returns `false` without touching the
    /// record when its current status is not `from`.
    async fn transition_status(
        &self,
        dataset_id: Uuid,
        from: DatasetStatus,
        to: DatasetStatus,
    ) -> PortResult<bool>;
}

#[async_trait]
pub trait AnalysisLog: Send + Sync {
    async fn record_analysis(&self, kind: AnalysisKind, user_id: Option<Uuid>) -> PortResult<()>;

    async fn count_analyses(&self) -> PortResult<usize>;
}

#[async_trait]
pub trait SpeciesClassifier: Send + Sync {
    /// Identifies the species in an image.
    async fn predict_species(&self, image: &[u8]) -> PortResult<SpeciesPrediction>;
}

#[async_trait]
pub trait DnaMatcher: Send + Sync {
    /// Returns candidate species ranked by descending similarity.
    async fn match_sequence(&self, sequence: &str) -> PortResult<Vec<DnaMatch>>;
}

/// Durable keyed storage backing the client session.
///
/// The contract is "survive a restart of the client process", nothing more.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> PortResult<Option<Session>>;

    fn save(&self, session: &Session) -> PortResult<()>;

    fn clear(&self) -> PortResult<()>;
}
