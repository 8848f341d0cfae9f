//! GitHub sign-in and sign-out.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use github_identity::{IdentityError, SecretString};
use serde::Deserialize;

use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// Render the login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate { error: None }
}

/// Verify a token and sign in.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.github.verify(SecretString::from(form.token)).await {
        Ok(user) => {
            state.workbench.sign_in(user).await;
            Redirect::to("/").into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "GitHub sign-in failed");
            let status = match err {
                IdentityError::InvalidToken => StatusCode::UNAUTHORIZED,
                IdentityError::EmptyToken => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            let page = LoginTemplate {
                error: Some(err.user_message().to_string()),
            };
            (status, page).into_response()
        }
    }
}

/// Sign out and lock gated options.
pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.workbench.sign_out().await;
    Redirect::to("/")
}
