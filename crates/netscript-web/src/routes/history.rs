//! Saved script history.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use netscript_core::SavedScript;

use crate::error::{Result, WebError};
use crate::state::AppState;

/// A saved script prepared for display.
pub struct HistoryRow {
    pub id: String,
    pub saved_at: String,
    pub summary: String,
    pub preview: String,
}

impl From<SavedScript> for HistoryRow {
    fn from(saved: SavedScript) -> Self {
        let saved_at = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(saved.timestamp)
            .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();
        let preview = saved.code.lines().take(6).collect::<Vec<_>>().join("\n");

        Self {
            id: saved.id,
            saved_at,
            summary: format!(
                "{} · {}s · {}",
                saved.config.os_target.label(),
                saved.config.scan_timeout,
                saved.config.targets_summary()
            ),
            preview,
        }
    }
}

/// History page template.
#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub rows: Vec<HistoryRow>,
}

/// Render the history page.
pub async fn history_page(State(state): State<AppState>) -> HistoryTemplate {
    HistoryTemplate {
        rows: state
            .workbench
            .history()
            .into_iter()
            .map(HistoryRow::from)
            .collect(),
    }
}

/// Load a saved script back into the form.
pub async fn load(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    if state.workbench.load(&id).await {
        Ok(Redirect::to("/"))
    } else {
        Err(WebError::NotFound(format!("Saved script {}", id)))
    }
}

/// Delete a saved script.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    state.workbench.delete(&id);
    Redirect::to("/history")
}

/// Delete every saved script.
pub async fn clear(State(state): State<AppState>) -> Redirect {
    state.workbench.clear_history();
    Redirect::to("/history")
}

/// Saved scripts as JSON, newest first.
pub async fn history_api(State(state): State<AppState>) -> Json<Vec<SavedScript>> {
    Json(state.workbench.history())
}
