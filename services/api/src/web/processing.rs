//! services/api/src/web/processing.rs
//!
//! The background task that moves an uploaded dataset from `pending` to `processed`.

use std::sync::Arc;
use std::time::Duration;

use oceanus_core::domain::DatasetStatus;
use oceanus_core::ports::DatasetRepository;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// What a scheduled transition ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Processed,
    /// The dataset had already left `pending`; nothing was changed.
    Skipped,
    Failed,
}

#[derive(Clone)]
pub struct DatasetProcessor {
    datasets: Arc<dyn DatasetRepository>,
    delay: Duration,
}

impl DatasetProcessor {
    pub fn new(datasets: Arc<dyn DatasetRepository>, delay: Duration) -> Self {
        Self { datasets, delay }
    }

    /// Spawns the delayed transition. There is no cancellation; if the process
    /// exits first, the dataset stays `pending`.
    pub fn schedule(&self, dataset_id: Uuid) -> JoinHandle<ProcessingOutcome> {
        let datasets = self.datasets.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match datasets
                .transition_status(dataset_id, DatasetStatus::Pending, DatasetStatus::Processed)
                .await
            {
                Ok(true) => {
                    info!("Dataset {} processed", dataset_id);
                    ProcessingOutcome::Processed
                }
                Ok(false) => {
                    info!("Dataset {} no longer pending, skipping", dataset_id);
                    ProcessingOutcome::Skipped
                }
                Err(e) => {
                    error!("Failed to process dataset {}: {}", dataset_id, e);
                    ProcessingOutcome::Failed
                }
            }
        })
    }
}
