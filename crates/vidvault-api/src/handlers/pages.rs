//! HTML page handlers.

use axum::extract::State;
use axum::response::Html;
use chrono::Utc;
use tracing::error;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{auth_page, home_page, AuthPage};

/// Catalog page for the signed-in user.
pub async fn home(State(state): State<AppState>, _user: AuthUser) -> Html<String> {
    let page = match state.store.list().await {
        Ok(videos) => home_page(&videos, &state.media, None, Utc::now()),
        Err(e) => {
            error!("Failed to fetch videos: {}", e);
            home_page(&[], &state.media, Some("Failed to fetch videos"), Utc::now())
        }
    };
    Html(page)
}

pub async fn sign_in(State(state): State<AppState>) -> Html<String> {
    Html(auth_page(AuthPage::SignIn, state.config.auth.sign_in_url.as_deref()))
}

pub async fn sign_up(State(state): State<AppState>) -> Html<String> {
    Html(auth_page(AuthPage::SignUp, state.config.auth.sign_up_url.as_deref()))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
