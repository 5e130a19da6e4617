use super::common::{render_user, UserResponse};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(render_user(&mut conn, viewer.id(), user)?))
}
