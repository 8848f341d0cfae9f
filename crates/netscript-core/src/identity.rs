//! Session identity record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::storage::{read_json, write_json, KeyValueStore};

/// Storage key for the signed-in user.
pub const USER_STORAGE_KEY: &str = "netscript_user";

/// GitHub profile as returned by `GET /user`.
///
/// Holding one only unlocks UI features; it is not a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl GitHubUser {
    /// Name to show in the header, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Persisted identity, held until explicit logout.
#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored user, if any. Unreadable records count as signed out.
    pub fn load(&self) -> Option<GitHubUser> {
        match read_json(self.store.as_ref(), USER_STORAGE_KEY) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Failed to load user");
                None
            }
        }
    }

    pub fn save(&self, user: &GitHubUser) {
        if let Err(err) = write_json(self.store.as_ref(), USER_STORAGE_KEY, user) {
            error!(error = %err, login = %user.login, "Failed to persist user");
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove(USER_STORAGE_KEY) {
            error!(error = %err, "Failed to clear user");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn octocat() -> GitHubUser {
        GitHubUser {
            login: "octocat".to_string(),
            name: None,
            avatar_url: "https://avatars.githubusercontent.com/u/583231".to_string(),
            html_url: "https://github.com/octocat".to_string(),
            bio: Some("mascot".to_string()),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let identity = IdentityStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(identity.load(), None);

        identity.save(&octocat());
        assert_eq!(identity.load(), Some(octocat()));

        identity.clear();
        assert_eq!(identity.load(), None);
    }

    #[test]
    fn test_corrupt_record_is_signed_out() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_STORAGE_KEY, "not json").unwrap();

        assert_eq!(IdentityStore::new(store).load(), None);
    }

    #[test]
    fn test_parses_github_payload() {
        let payload = r#"{
            "login": "octocat",
            "id": 1,
            "name": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat",
            "public_repos": 8
        }"#;

        let user: GitHubUser = serde_json::from_str(payload).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.display_name(), "octocat");
        assert_eq!(user.bio, None);
    }
}
