use super::representation::{render_one, RecipeAction, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let view = render_one(&mut conn, viewer.id(), id, RecipeAction::Retrieve)?;
    Ok(Json(view))
}
