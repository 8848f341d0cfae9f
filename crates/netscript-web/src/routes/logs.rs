//! Activity log page and exports.

use askama::Template;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use netscript_core::activity::export_file_name;
use netscript_core::LogEntry;

use crate::error::Result;
use crate::state::AppState;

/// Logs page template.
#[derive(Template)]
#[template(path = "logs.html")]
pub struct LogsTemplate {
    pub entries: Vec<LogEntry>,
}

/// Standalone page that opens the print dialog.
#[derive(Template)]
#[template(path = "logs_print.html")]
pub struct LogsPrintTemplate {
    pub entries: Vec<LogEntry>,
    pub generated_at: String,
}

/// Render the activity log.
pub async fn logs_page(State(state): State<AppState>) -> LogsTemplate {
    LogsTemplate {
        entries: state.workbench.activity().entries(),
    }
}

fn attachment(content_type: &'static str, extension: &str, body: String) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now(), extension)
    );
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Download the log as CSV.
pub async fn export_csv(State(state): State<AppState>) -> Response {
    attachment(
        "text/csv;charset=utf-8",
        "csv",
        state.workbench.activity().to_csv(),
    )
}

/// Download the log as JSON.
pub async fn export_json(State(state): State<AppState>) -> Result<Response> {
    let json = state.workbench.activity().to_json()?;
    Ok(attachment("application/json", "json", json))
}

/// Printable report.
pub async fn print_view(State(state): State<AppState>) -> LogsPrintTemplate {
    LogsPrintTemplate {
        entries: state.workbench.activity().entries(),
        generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

/// Drop the local log. Copies already relayed are unaffected.
pub async fn clear(State(state): State<AppState>) -> Redirect {
    state.workbench.activity().clear();
    Redirect::to("/logs")
}
