//! Web workbench for generating Python network scanner scripts.
//!
//! Serves the configuration form, generated output, saved history, the
//! chat assistant and the activity log as server-rendered HTML.

mod config;
mod error;
mod qr;
mod routes;
mod state;
mod workbench;

use std::sync::Arc;

use activity_relay::RelayConfig;
use gemini_brain::GeminiClient;
use github_identity::{GitHubClient, IdentityConfig};
use netscript_core::{LogSink, SqliteStore, TextGenerator};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::workbench::Workbench;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("netscript_web=info,netscript_core=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting NetScript web server");

    // Open the key-value store
    let store = Arc::new(SqliteStore::open(&config.db_path)?);
    info!(path = %config.db_path.display(), "Opened store");

    // The app stays usable without a key: generation reports the error
    // and chat is disabled.
    let generator: Option<Arc<dyn TextGenerator>> = match GeminiClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(err) => {
            warn!(error = %err, "Gemini client unavailable");
            None
        }
    };

    let sink: Option<Arc<dyn LogSink>> = match RelayConfig::from_env().into_relay()? {
        Some(relay) => Some(Arc::new(relay)),
        None => None,
    };

    let github = GitHubClient::new(IdentityConfig::from_env())?;

    // Build application state
    let workbench = Workbench::new(store, generator, sink, config.explain_prefix_chars);
    let state = AppState::new(workbench, github);

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "NetScript web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
