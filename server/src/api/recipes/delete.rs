use super::representation::find_recipe;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, id)?;
    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    // Tags, ingredients, favorites and cart entries cascade.
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    tracing::info!(user_id = user.id, recipe_id = recipe.id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
