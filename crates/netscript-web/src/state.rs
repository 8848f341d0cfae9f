//! Application state shared across handlers.

use std::sync::Arc;

use github_identity::GitHubClient;

use crate::workbench::Workbench;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The single workbench session.
    pub workbench: Arc<Workbench>,
    /// GitHub token verifier.
    pub github: GitHubClient,
}

impl AppState {
    /// Create new application state.
    pub fn new(workbench: Workbench, github: GitHubClient) -> Self {
        Self {
            workbench: Arc::new(workbench),
            github,
        }
    }
}
