use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::db::{is_unique_violation, DbPool};
use crate::error::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::validation::{validate_signup, SignupInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid input or email/username taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim();
    let username = req.username.trim();
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();

    validate_signup(&SignupInput {
        email,
        username,
        first_name,
        last_name,
        password: &req.password,
    })?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

    let mut conn = pool.get()?;

    let new_user = NewUser {
        email,
        username,
        first_name,
        last_name,
        password_hash: &password_hash,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::bad_request("A user with that email or username already exists")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}
