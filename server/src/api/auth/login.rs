use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::config::Settings;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials";

#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(settings): State<Arc<Settings>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(users::email.eq(req.email.trim()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user else {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let auth_token = create_session(&mut conn, user.id, settings.session_ttl_days)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}
