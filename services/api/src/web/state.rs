//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use oceanus_core::ports::{
    AnalysisLog, DatasetRepository, DnaMatcher, SpeciesClassifier, UserRepository,
};

use crate::adapters::{FixtureDnaMatcher, FixtureSpeciesClassifier, InMemoryStore, TokenService};
use crate::config::Config;
use crate::web::processing::DatasetProcessor;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub datasets: Arc<dyn DatasetRepository>,
    pub analyses: Arc<dyn AnalysisLog>,
    pub species: Arc<dyn SpeciesClassifier>,
    pub dna: Arc<dyn DnaMatcher>,
    pub tokens: TokenService,
    pub processor: DatasetProcessor,
}

impl AppState {
    /// Wires every port to the in-memory and fixture adapters.
    pub fn in_memory(config: Arc<Config>) -> Self {
        let store = Arc::new(if config.seed_demo_data {
            InMemoryStore::seeded()
        } else {
            InMemoryStore::new()
        });
        let datasets: Arc<dyn DatasetRepository> = store.clone();

        Self {
            users: store.clone(),
            analyses: store,
            processor: DatasetProcessor::new(datasets.clone(), config.processing_delay),
            datasets,
            species: Arc::new(FixtureSpeciesClassifier::new(config.species_latency)),
            dna: Arc::new(FixtureDnaMatcher::new(config.dna_latency)),
            tokens: TokenService::new(config.token_secret.as_bytes().to_vec()),
            config,
        }
    }
}
