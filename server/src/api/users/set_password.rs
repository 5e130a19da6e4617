use crate::api::extract::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::users;
use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use diesel::prelude::*;
use foodgram_core::validation::validate_password;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or invalid new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }
    validate_password(&req.new_password)?;

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

    let mut conn = pool.get()?;
    diesel::update(users::table.find(user.id))
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id = user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
