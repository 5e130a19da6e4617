use super::list::TagResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let tag: Tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag"))?;

    Ok(Json(TagResponse::from(tag)))
}
