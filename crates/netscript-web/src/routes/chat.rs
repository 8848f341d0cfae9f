//! Chat assistant.

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
}

/// Send a chat message and return to the chat panel.
pub async fn send(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    if let Err(err) = state.workbench.chat().send(&form.message).await {
        state.workbench.set_notice(err.to_string()).await;
    }
    Redirect::to("/#chat")
}
