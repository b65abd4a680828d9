// EstateHub - app/session.rs
//
// Mock session store: the user directory plus the single active session,
// mirrored to a JSON file so a login survives restarts.
//
// Design principles:
// - The session file is saved atomically (write temp, rename) so a crash
//   during save never corrupts the previous good session.
// - Load errors are silently discarded: a missing, corrupt or incompatible
//   file just starts logged out.
// - Passwords are accepted unchecked and never stored or logged.

use crate::core::model::{Role, User};
use crate::core::seed;
use crate::platform::fs::{remove_if_exists, write_atomic};
use crate::util::constants::SESSION_FILE_NAME;
use crate::util::error::SessionError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Increment this constant whenever `SessionData` changes in a breaking way.
/// Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// On-disk session snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub version: u32,
    pub user: User,
}

/// Registration form fields.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Dashboard route a role lands on after login or registration.
pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Buyer => "/buyer",
        Role::Seller => "/seller",
        Role::Partner => "/partner",
        Role::Admin => "/admin",
    }
}

/// Save `data` to `path` atomically.
pub fn save(data: &SessionData, path: &Path) -> Result<(), SessionError> {
    let json =
        serde_json::to_string_pretty(data).map_err(|e| SessionError::Serialise { source: e })?;
    write_atomic(path, json.as_bytes()).map_err(|e| SessionError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure,
/// version mismatch). The caller treats `None` as "logged out".
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            // "Not found" is the normal logged-out case.
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting logged out"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting logged out"
        );
        return None;
    }

    Some(data)
}

/// User directory and active session.
#[derive(Debug)]
pub struct SessionStore {
    users: Vec<User>,
    current: Option<User>,
    /// `None` keeps the session in memory only.
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(users: Vec<User>, path: Option<PathBuf>) -> Self {
        Self {
            users,
            current: None,
            path,
        }
    }

    /// Store over the demo user directory.
    pub fn seeded(path: Option<PathBuf>) -> Self {
        Self::new(seed::users(), path)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    fn find_by_email(&self, email: &str) -> Option<&User> {
        let wanted = email.trim().to_lowercase();
        self.users.iter().find(|u| u.email.to_lowercase() == wanted)
    }

    /// Log in by email. Any non-empty password is accepted.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
        let invalid = || SessionError::InvalidCredentials {
            email: email.to_string(),
        };
        if password.is_empty() {
            return Err(invalid());
        }
        let user = self.find_by_email(email).cloned().ok_or_else(invalid)?;

        tracing::info!(user_id = %user.id, role = %user.role, "Logged in");
        self.activate(user.clone());
        Ok(user)
    }

    /// Register a new user and make it the active session.
    ///
    /// Name, email and password are required. A taken email
    /// (case-insensitive) fails and leaves the directory as is.
    pub fn register(&mut self, form: NewUser) -> Result<User, SessionError> {
        for (field, value) in [
            ("name", &form.name),
            ("email", &form.email),
            ("password", &form.password),
        ] {
            if value.trim().is_empty() {
                return Err(SessionError::MissingField { field });
            }
        }
        if self.find_by_email(&form.email).is_some() {
            return Err(SessionError::DuplicateEmail { email: form.email });
        }

        let user = User {
            id: self.next_user_id(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            role: form.role,
            created_at: Utc::now(),
            avatar: None,
        };
        self.users.push(user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "Registered new user");
        self.activate(user.clone());
        Ok(user)
    }

    /// Clear the active session and its persisted copy. Idempotent.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        if let Some(path) = &self.path {
            remove_if_exists(path).map_err(|e| SessionError::Persist {
                path: path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Restore the persisted session, if any. Returns the restored user.
    ///
    /// A user registered in an earlier run is added back to the directory.
    pub fn restore(&mut self) -> Option<&User> {
        let data = load(self.path.as_deref()?)?;
        if !self.users.iter().any(|u| u.id == data.user.id) {
            self.users.push(data.user.clone());
        }
        tracing::info!(user_id = %data.user.id, "Session restored");
        self.current = Some(data.user);
        self.current.as_ref()
    }

    /// `user-N` with N one past the highest numbered id in the directory.
    fn next_user_id(&self) -> String {
        let highest = self
            .users
            .iter()
            .filter_map(|u| u.id.strip_prefix("user-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("user-{}", highest + 1)
    }

    fn activate(&mut self, user: User) {
        if let Some(path) = &self.path {
            let data = SessionData {
                version: SESSION_VERSION,
                user: user.clone(),
            };
            // The in-memory login stands even when the disk copy fails.
            if let Err(e) = save(&data, path) {
                tracing::warn!(error = %e, "Session not persisted");
            }
        }
        self.current = Some(user);
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::seeded(Some(session_path(dir.path())))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Dana Lee".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            role: Role::Seller,
        }
    }

    #[test]
    fn test_login_is_case_insensitive() {
        let mut store = SessionStore::seeded(None);
        let upper = store.login("JOHN@EXAMPLE.COM", "x").unwrap();
        let lower = store.login("john@example.com", "anything").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.id, "user-1");
    }

    #[test]
    fn test_login_rejects_unknown_email_and_empty_password() {
        let mut store = SessionStore::seeded(None);
        assert!(matches!(
            store.login("nobody@example.com", "pw"),
            Err(SessionError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            store.login("john@example.com", ""),
            Err(SessionError::InvalidCredentials { .. })
        ));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_register_duplicate_leaves_directory_unchanged() {
        let mut store = SessionStore::seeded(None);
        let before = store.users().to_vec();
        let err = store.register(new_user("Jane@Example.com")).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateEmail { .. }));
        assert_eq!(store.users(), before.as_slice());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_register_rejects_blank_fields() {
        let mut store = SessionStore::seeded(None);
        let before = store.users().len();

        let mut blank_name = new_user("dana@example.com");
        blank_name.name = "  ".to_string();
        let blank_email = new_user("   ");
        let mut blank_password = new_user("dana@example.com");
        blank_password.password = String::new();

        for (form, expected) in [
            (blank_name, "name"),
            (blank_email, "email"),
            (blank_password, "password"),
        ] {
            match store.register(form) {
                Err(SessionError::MissingField { field }) => assert_eq!(field, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
        assert_eq!(store.users().len(), before);
        assert!(store.current_user().is_none());
        assert!(store.login("", "pw").is_err());
    }

    #[test]
    fn test_register_assigns_next_id_and_logs_in() {
        let mut store = SessionStore::seeded(None);
        let user = store.register(new_user("dana@example.com")).unwrap();
        assert_eq!(user.id, "user-8");
        assert_eq!(store.current_user(), Some(&user));
        assert_eq!(landing_route(user.role), "/seller");
    }

    #[test]
    fn test_registered_user_survives_restart() {
        let dir = TempDir::new().unwrap();
        let registered = store_in(&dir).register(new_user("dana@example.com")).unwrap();

        let mut next_run = store_in(&dir);
        let restored = next_run.restore().cloned();
        assert_eq!(restored, Some(registered.clone()));
        // Back in the directory, so login by email works again.
        assert_eq!(next_run.login("DANA@example.com", "pw").unwrap().id, registered.id);
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.login("admin@example.com", "pw").unwrap();
        assert!(session_path(dir.path()).exists());

        store.logout().unwrap();
        store.logout().unwrap();
        assert!(store.current_user().is_none());
        assert!(store_in(&dir).restore().is_none());
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nonexistent.json")).is_none());
    }

    #[test]
    fn test_load_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        let data = SessionData {
            version: 99,
            user: seed::users().remove(0),
        };
        save(&data, &path).unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_save_into_file_parent_fails_with_persist() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not dir").unwrap();
        let data = SessionData {
            version: SESSION_VERSION,
            user: seed::users().remove(0),
        };
        let err = save(&data, &blocker.join("session.json")).unwrap_err();
        assert!(matches!(err, SessionError::Persist { .. }));
    }
}
