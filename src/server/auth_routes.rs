//! `/api/auth/*` handlers.

use super::AppState;
use crate::auth::{self, CurrentUser, blocking};
use crate::config::{AuthConfig, SESSION_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::types::User;
use crate::validation::{RegisterInput, ValidationError, validate_email, validate_registration};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

/// `Set-Cookie` value for a session. `None` clears the cookie.
pub fn session_cookie(token: Option<&str>, auth: &AuthConfig) -> String {
    let (value, max_age) = match token {
        Some(token) => (token, auth.session_ttl_seconds.max(0)),
        None => ("", 0),
    };
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if auth.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[derive(Serialize)]
struct MessageWithUser {
    message: &'static str,
    user: User,
}

async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageWithUser>)> {
    let Json(input) = body.map_err(ApiError::invalid_body)?;
    let registration = validate_registration(&input)?;

    let user = auth::register(state.db.clone(), registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageWithUser {
            message: "User created successfully",
            user,
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
struct LoginInput {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: DateTime<Utc>,
    user: User,
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body.map_err(ApiError::invalid_body)?;
    let email = validate_email(input.email.as_deref())?;
    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or(ValidationError::PasswordRequired)?;

    let auth_config = &state.config.auth;
    let (session, user) = auth::login(
        state.db.clone(),
        email,
        password,
        auth_config.session_ttl_seconds,
    )
    .await?;

    let cookie = session_cookie(Some(&session.token), auth_config);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: session.token,
            expires_at: session.expires_at,
            user,
        }),
    ))
}

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    auth::logout(state.db.clone(), current.token).await?;
    tracing::info!(user_id = %current.user_id, "User logged out");

    Ok((
        [(header::SET_COOKIE, session_cookie(None, &state.config.auth))],
        Json(Message {
            message: "Logged out successfully",
        }),
    ))
}

#[derive(Serialize)]
struct SessionResponse {
    user: User,
}

async fn session(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<SessionResponse>> {
    let db = state.db.clone();
    let user = blocking(move || db.get_user(&current.user_id))
        .await?
        .ok_or_else(ApiError::user_not_found)?;
    Ok(Json(SessionResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_ttl_and_flags() {
        let auth = AuthConfig {
            session_ttl_seconds: 3600,
            cookie_secure: false,
        };
        assert_eq!(
            session_cookie(Some("abc"), &auth),
            "taskpad_session=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600"
        );
    }

    #[test]
    fn clearing_cookie_expires_it() {
        let auth = AuthConfig {
            session_ttl_seconds: 3600,
            cookie_secure: true,
        };
        let cookie = session_cookie(None, &auth);
        assert!(cookie.starts_with("taskpad_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }
}
