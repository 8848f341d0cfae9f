//! Route handlers for the web workbench.

pub mod chat;
pub mod generator;
pub mod health;
pub mod history;
pub mod identity;
pub mod logs;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(generator::index_page))
        .route("/history", get(history::history_page))
        .route("/login", get(identity::login_page).post(identity::login))
        .route("/logs", get(logs::logs_page))
        // Form actions
        .route("/config", post(generator::update_config))
        .route("/config/toggle/:feature", post(generator::toggle_feature))
        .route("/generate", post(generator::generate))
        .route("/save", post(generator::save))
        .route("/history/clear", post(history::clear))
        .route("/history/:id/load", post(history::load))
        .route("/history/:id/delete", post(history::delete))
        .route("/logs/clear", post(logs::clear))
        .route("/logout", post(identity::logout))
        .route("/chat", post(chat::send))
        // Downloads
        .route("/qr.svg", get(generator::qr_code))
        .route("/logs/export.csv", get(logs::export_csv))
        .route("/logs/export.json", get(logs::export_json))
        .route("/logs/print", get(logs::print_view))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/config", get(generator::config_api))
        .route("/api/history", get(history::history_api))
}
