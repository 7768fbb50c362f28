//! services/api/src/adapters/memory.rs
//!
//! The in-memory store: the concrete implementation of the user, dataset and
//! analysis ports. Nothing is persisted; a restart brings back the seed data.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use oceanus_core::domain::{
    AnalysisKind, AnalysisRecord, Dataset, DatasetFilter, DatasetStatus, NewDataset, Role, User,
};
use oceanus_core::ports::{
    AnalysisLog, DatasetRepository, PortError, PortResult, UserRepository,
};
use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    datasets: HashMap<Uuid, Dataset>,
    // Creation order, so listings stay stable.
    dataset_order: Vec<Uuid>,
    analyses: Vec<AnalysisRecord>,
}

/// Shared in-memory tables behind a single async lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the four demo accounts and three datasets.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut tables = Tables::default();

        for (email, name, role) in DEMO_USERS {
            let user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password: DEMO_PASSWORD.to_string(),
                name: name.to_string(),
                role: *role,
                last_login_at: None,
                created_at: now,
            };
            tables.users.insert(user.id, user);
        }

        for (days_ago, name, kind, location, size) in DEMO_DATASETS {
            let dataset = Dataset {
                id: Uuid::new_v4(),
                name: name.to_string(),
                kind: kind.to_string(),
                location: location.to_string(),
                size: size.to_string(),
                status: DatasetStatus::Processed,
                metadata: json!({ "source": "seed" }),
                created_at: now - Duration::days(*days_ago),
                owner_id: None,
            };
            tables.dataset_order.push(dataset.id);
            tables.datasets.insert(dataset.id, dataset);
        }

        Self {
            tables: RwLock::new(tables),
        }
    }
}

pub const DEMO_PASSWORD: &str = "password";

const DEMO_USERS: &[(&str, &str, Role)] = &[
    ("admin@oceanus.com", "Dr. Sarah Chen", Role::Admin),
    ("researcher@oceanus.com", "Dr. John Marine", Role::Researcher),
    ("policy@oceanus.com", "Policy Analyst", Role::PolicyUser),
    ("guest@oceanus.com", "Guest User", Role::Guest),
];

const DEMO_DATASETS: &[(i64, &str, &str, &str, &str)] = &[
    (12, "Deep Sea Coral Survey", "oceanographic", "Pacific Ocean", "2.4 GB"),
    (7, "Arctic Plankton Distribution", "edna", "Arctic Ocean", "856 MB"),
    (3, "Coastal Water Quality", "sensor", "Atlantic Coast", "1.2 GB"),
];

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        user.last_login_at = Some(at);
        Ok(())
    }
}

#[async_trait]
impl DatasetRepository for InMemoryStore {
    async fn list_datasets(&self, filter: &DatasetFilter) -> PortResult<Vec<Dataset>> {
        let tables = self.tables.read().await;
        Ok(tables
            .dataset_order
            .iter()
            .filter_map(|id| tables.datasets.get(id))
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn get_dataset(&self, dataset_id: Uuid) -> PortResult<Dataset> {
        self.tables
            .read()
            .await
            .datasets
            .get(&dataset_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Dataset not found".to_string()))
    }

    async fn create_dataset(
        &self,
        dataset: NewDataset,
        owner_id: Option<Uuid>,
    ) -> PortResult<Dataset> {
        let record = Dataset {
            id: Uuid::new_v4(),
            name: dataset.name,
            kind: dataset.kind,
            location: dataset.location,
            size: dataset.size,
            status: dataset.status,
            metadata: dataset.metadata,
            created_at: Utc::now(),
            owner_id,
        };

        let mut tables = self.tables.write().await;
        tables.dataset_order.push(record.id);
        tables.datasets.insert(record.id, record.clone());
        Ok(record)
    }

    async fn transition_status(
        &self,
        dataset_id: Uuid,
        from: DatasetStatus,
        to: DatasetStatus,
    ) -> PortResult<bool> {
        let mut tables = self.tables.write().await;
        let dataset = tables
            .datasets
            .get_mut(&dataset_id)
            .ok_or_else(|| PortError::NotFound("Dataset not found".to_string()))?;
        if dataset.status != from {
            return Ok(false);
        }
        dataset.status = to;
        Ok(true)
    }
}

#[async_trait]
impl AnalysisLog for InMemoryStore {
    async fn record_analysis(&self, kind: AnalysisKind, user_id: Option<Uuid>) -> PortResult<()> {
        self.tables.write().await.analyses.push(AnalysisRecord {
            id: Uuid::new_v4(),
            kind,
            user_id,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn count_analyses(&self) -> PortResult<usize> {
        Ok(self.tables.read().await.analyses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_dataset(name: &str) -> NewDataset {
        NewDataset {
            name: name.to_string(),
            kind: "edna".to_string(),
            location: "Monterey Bay".to_string(),
            size: "0 MB".to_string(),
            status: DatasetStatus::Pending,
            metadata: json!({}),
        }
    }

    #[tokio::test]
    async fn seeded_store_has_one_user_per_role() {
        let store = InMemoryStore::seeded();
        for (email, _, role) in DEMO_USERS {
            let user = store.get_user_by_email(email).await.unwrap();
            assert_eq!(user.role, *role);
            assert_eq!(user.password, DEMO_PASSWORD);
        }
        assert_eq!(store.tables.read().await.users.len(), Role::ALL.len());
        let guest = store.get_user_by_email("GUEST@oceanus.com").await.unwrap();
        assert_eq!(guest.role, Role::Guest);
    }

    #[tokio::test]
    async fn record_login_only_touches_last_login() {
        let store = InMemoryStore::seeded();
        let before = store.get_user_by_email("admin@oceanus.com").await.unwrap();
        let at = Utc::now();
        store.record_login(before.id, at).await.unwrap();
        let after = store.get_user(before.id).await.unwrap();

        assert_eq!(after.last_login_at, Some(at));
        assert_eq!(after.email, before.email);
        assert_eq!(after.role, before.role);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn datasets_list_in_creation_order() {
        let store = InMemoryStore::new();
        let first = store.create_dataset(new_dataset("first"), None).await.unwrap();
        let second = store.create_dataset(new_dataset("second"), None).await.unwrap();

        let all = store.list_datasets(&DatasetFilter::default()).await.unwrap();
        assert_eq!(
            all.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn transition_is_idempotent() {
        let store = InMemoryStore::new();
        let dataset = store.create_dataset(new_dataset("x"), None).await.unwrap();

        let applied = store
            .transition_status(dataset.id, DatasetStatus::Pending, DatasetStatus::Processed)
            .await
            .unwrap();
        let again = store
            .transition_status(dataset.id, DatasetStatus::Pending, DatasetStatus::Processed)
            .await
            .unwrap();

        assert!(applied);
        assert!(!again);
        let stored = store.get_dataset(dataset.id).await.unwrap();
        assert_eq!(stored.status, DatasetStatus::Processed);
        assert_eq!(
            Dataset {
                status: DatasetStatus::Pending,
                ..stored
            },
            dataset
        );
    }

    #[tokio::test]
    async fn unknown_dataset_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.get_dataset(Uuid::new_v4()).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn analyses_are_counted() {
        let store = InMemoryStore::new();
        store.record_analysis(AnalysisKind::DnaMatch, None).await.unwrap();
        store
            .record_analysis(AnalysisKind::SpeciesPredict, Some(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(store.count_analyses().await.unwrap(), 2);
    }
}
