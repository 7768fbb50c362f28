//! services/api/src/adapters/session_file.rs
//!
//! File-backed `SessionStorage` for the terminal client.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use oceanus_core::domain::Session;
use oceanus_core::ports::{PortError, PortResult, SessionStorage};

pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Writes `bytes` to a file only the owner can read, since it holds a bearer token.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten a leftover file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> PortResult<Option<Session>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| PortError::Unexpected(format!("corrupt session file: {}", e)))
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        let json =
            serde_json::to_vec_pretty(session).map_err(|e| PortError::Unexpected(e.to_string()))?;
        // Write then rename so a crash never leaves half a session behind.
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &json).map_err(|e| PortError::Unexpected(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| PortError::Unexpected(e.to_string()))
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanus_core::domain::{PublicUser, Role};
    use oceanus_core::session::SessionStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            token: "v1.payload.sig".to_string(),
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "policy@oceanus.com".to_string(),
                name: "Policy Analyst".to_string(),
                role: Role::PolicyUser,
            },
            expires_in: 3600,
        }
    }

    #[test]
    fn missing_file_means_no_session_and_clear_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.load().unwrap(), None);
        assert!(storage.clear().is_ok());
    }

    #[test]
    fn saved_session_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        let session = session();
        storage.save(&session).unwrap();
        assert_eq!(storage.load().unwrap(), Some(session));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(path.with_extension("tmp"), b"stale").unwrap();
        std::fs::set_permissions(
            path.with_extension("tmp"),
            std::fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        FileSessionStorage::new(&path).save(&session()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn store_restores_across_instances_and_drops_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let s = session();

        SessionStore::restore(Arc::new(FileSessionStorage::new(&path)))
            .login(s.token.clone(), s.user.clone(), s.expires_in)
            .unwrap();
        let reloaded = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(reloaded.get(), Some(s));

        std::fs::write(&path, b"{not json").unwrap();
        let corrupt = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert!(!corrupt.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn unknown_role_in_file_is_treated_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let raw = serde_json::json!({
            "token": "t",
            "user": {"id": Uuid::new_v4(), "email": "x@y", "name": "X", "role": "superuser"},
            "expiresIn": 3600
        });
        std::fs::write(&path, raw.to_string()).unwrap();

        let store = SessionStore::restore(Arc::new(FileSessionStorage::new(&path)));
        assert!(!store.is_authenticated());
    }
}
