//! crates/oceanus_core/src/session.rs
//!
//! The client-side session store: who is logged in, with which role and token.
//!
//! The store is an explicit object handed to whoever needs it. It performs no
//! network calls; it only holds state and writes it through to a
//! [`SessionStorage`] so a restarted client picks the session back up.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::domain::{PublicUser, Session};
use crate::ports::{PortError, PortResult, SessionStorage};

pub struct SessionStore {
    current: RwLock<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Builds a store and loads whatever session the storage holds.
    ///
    /// An unreadable persisted record is dropped and the store starts logged out.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let current = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding unreadable persisted session: {}", e);
                if let Err(e) = storage.clear() {
                    warn!("Failed to clear persisted session: {}", e);
                }
                None
            }
        };

        Self {
            current: RwLock::new(current),
            storage,
        }
    }

    pub fn get(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn user(&self) -> Option<PublicUser> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Stores token and user together. Readers see both or neither.
    ///
    /// The session is persisted before it becomes visible, so a failed write
    /// leaves the previous state in place.
    pub fn login(&self, token: String, user: PublicUser, expires_in: u64) -> PortResult<()> {
        if token.trim().is_empty() {
            return Err(PortError::Validation("Token must not be empty".to_string()));
        }
        let session = Session {
            token,
            user,
            expires_in,
        };

        let mut current = self.write();
        self.storage.save(&session)?;
        *current = Some(session);
        Ok(())
    }

    /// Swaps the token of the current session, keeping the user.
    pub fn refresh(&self, token: String, expires_in: u64) -> PortResult<()> {
        if token.trim().is_empty() {
            return Err(PortError::Validation("Token must not be empty".to_string()));
        }
        let mut current = self.write();
        let session = current
            .as_ref()
            .map(|s| Session {
                token,
                user: s.user.clone(),
                expires_in,
            })
            .ok_or_else(|| PortError::Unauthorized("No active session".to_string()))?;

        self.storage.save(&session)?;
        *current = Some(session);
        Ok(())
    }

    /// Clears the session in memory and in storage.
    ///
    /// Memory is cleared even when storage fails; the error is still returned.
    pub fn logout(&self) -> PortResult<()> {
        let mut current = self.write();
        *current = None;
        self.storage.clear()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> PortResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use uuid::Uuid;

    fn user(role: Role) -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            email: format!("{}@oceanus.com", role),
            name: "Test User".to_string(),
            role,
        }
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn load(&self) -> PortResult<Option<Session>> {
            Err(PortError::Unexpected("corrupt".to_string()))
        }
        fn save(&self, _session: &Session) -> PortResult<()> {
            Err(PortError::Unexpected("disk full".to_string()))
        }
        fn clear(&self) -> PortResult<()> {
            Ok(())
        }
    }

    #[test]
    fn starts_logged_out_with_empty_storage() {
        let store = SessionStore::restore(Arc::new(MemorySessionStorage::new()));
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn login_sets_token_and_user_together() {
        let store = SessionStore::restore(Arc::new(MemorySessionStorage::new()));
        let admin = user(Role::Admin);
        store.login("tok".to_string(), admin.clone(), 3600).unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(admin));
    }

    #[test]
    fn empty_token_is_rejected_and_nothing_is_stored() {
        let store = SessionStore::restore(Arc::new(MemorySessionStorage::new()));
        let err = store.login("  ".to_string(), user(Role::Guest), 3600);
        assert!(matches!(err, Err(PortError::Validation(_))));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn session_survives_a_new_store_over_the_same_storage() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let researcher = user(Role::Researcher);
        SessionStore::restore(storage.clone())
            .login("tok".to_string(), researcher.clone(), 3600)
            .unwrap();

        let reloaded = SessionStore::restore(storage);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user(), Some(researcher));
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::restore(storage.clone());
        store.login("tok".to_string(), user(Role::Admin), 3600).unwrap();
        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn refresh_keeps_user_and_requires_a_session() {
        let store = SessionStore::restore(Arc::new(MemorySessionStorage::new()));
        assert!(matches!(
            store.refresh("new".to_string(), 3600),
            Err(PortError::Unauthorized(_))
        ));

        let guest = user(Role::Guest);
        store.login("old".to_string(), guest.clone(), 604800).unwrap();
        store.refresh("new".to_string(), 3600).unwrap();

        let session = store.get().unwrap();
        assert_eq!(session.token, "new");
        assert_eq!(session.user, guest);
        assert_eq!(session.expires_in, 3600);
    }

    #[test]
    fn failed_persist_leaves_previous_state() {
        let store = SessionStore::restore(Arc::new(FailingStorage));
        assert!(!store.is_authenticated());
        assert!(store.login("tok".to_string(), user(Role::Admin), 3600).is_err());
        assert!(!store.is_authenticated());
    }
}
