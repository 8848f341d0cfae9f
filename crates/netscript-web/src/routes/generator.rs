//! Main page, configuration form and generation actions.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use netscript_core::gate::{can_modify, GateDecision, GatedFeature};
use netscript_core::prompt::INSTALL_COMMAND;
use netscript_core::{ChatMessage, GitHubUser, OsTarget, ScriptConfig};
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, WebError};
use crate::qr::{render_svg, QR_TOO_LONG};
use crate::state::AppState;
use crate::workbench::{ConfigUpdate, GenerateOutcome, Session};

/// One entry of the OS target dropdown.
pub struct OsOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Main page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub session: Session,
    pub user: Option<GitHubUser>,
    pub can_modify: bool,
    pub os_options: Vec<OsOption>,
    pub transcript: Vec<ChatMessage>,
    pub chat_active: bool,
    pub chat_sending: bool,
    pub saved_count: usize,
    pub install_command: &'static str,
}

/// Configuration form. Unchecked boxes are absent from the body.
#[derive(Debug, Deserialize)]
pub struct ConfigForm {
    pub scan_wifi: Option<String>,
    pub scan_bluetooth: Option<String>,
    pub include_mac: Option<String>,
    pub os_target: String,
    pub scan_timeout: String,
    pub export_report: Option<String>,
    pub port_range: Option<String>,
}

impl ConfigForm {
    fn into_update(self) -> Result<ConfigUpdate> {
        let os_target: OsTarget = self.os_target.parse().map_err(WebError::BadRequest)?;
        let scan_timeout = self
            .scan_timeout
            .trim()
            .parse()
            .map_err(|_| WebError::BadRequest("scan timeout must be a number".to_string()))?;

        Ok(ConfigUpdate {
            scan_wifi: self.scan_wifi.is_some(),
            scan_bluetooth: self.scan_bluetooth.is_some(),
            include_mac: self.include_mac.is_some(),
            os_target,
            scan_timeout,
            export_report: self.export_report.is_some(),
            port_range: self.port_range,
        })
    }
}

/// Render the main page.
pub async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    let workbench = &state.workbench;
    let session = workbench.take_view().await;
    let user = workbench.user();

    let os_options = OsTarget::ALL
        .into_iter()
        .map(|target| OsOption {
            value: target.as_str(),
            label: target.label(),
            selected: target == session.config.os_target,
        })
        .collect();

    IndexTemplate {
        can_modify: can_modify(user.as_ref()),
        user,
        os_options,
        transcript: workbench.chat().transcript().await,
        chat_active: workbench.chat().is_active(),
        chat_sending: workbench.chat().is_sending(),
        saved_count: workbench.history().len(),
        install_command: INSTALL_COMMAND,
        session,
    }
}

/// Apply the configuration form.
pub async fn update_config(
    State(state): State<AppState>,
    Form(form): Form<ConfigForm>,
) -> Result<Redirect> {
    state.workbench.update_config(form.into_update()?).await;
    Ok(Redirect::to("/"))
}

/// Toggle a gated feature, routing to sign-in when required.
pub async fn toggle_feature(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Redirect> {
    let feature: GatedFeature = feature.parse().map_err(WebError::BadRequest)?;

    match state.workbench.toggle(feature).await {
        GateDecision::LoginRequired => Ok(Redirect::to("/login")),
        GateDecision::Applied(_)
        | GateDecision::RequiresDeepScan
        | GateDecision::Updated
        | GateDecision::Ignored => Ok(Redirect::to("/")),
    }
}

/// Generate and explain a script.
pub async fn generate(State(state): State<AppState>) -> Redirect {
    match state.workbench.generate().await {
        GenerateOutcome::Generated => info!("Script generated"),
        GenerateOutcome::Failed(_) => {}
        GenerateOutcome::Superseded => info!("Generation superseded by a newer request"),
    }
    Redirect::to("/")
}

/// Save the current script to history.
pub async fn save(State(state): State<AppState>) -> Redirect {
    match state.workbench.save().await {
        Some(_) => state.workbench.set_notice("Script saved to history.").await,
        None => state.workbench.set_notice("Nothing to save yet.").await,
    }
    Redirect::to("/")
}

/// QR code of the current script.
pub async fn qr_code(State(state): State<AppState>) -> Result<Response> {
    let session = state.workbench.snapshot().await;
    if session.code.is_empty() {
        return Err(WebError::NotFound("Script".to_string()));
    }

    Ok(match render_svg(&session.code) {
        Some(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        None => (StatusCode::UNPROCESSABLE_ENTITY, QR_TOO_LONG).into_response(),
    })
}

/// Current configuration as JSON.
pub async fn config_api(State(state): State<AppState>) -> Json<ScriptConfig> {
    Json(state.workbench.snapshot().await.config)
}
