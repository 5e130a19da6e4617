use super::representation::{find_recipe, render_one, RecipeAction, ShortRecipe};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{is_unique_violation, DbPool};
use crate::error::ApiError;
use crate::models::NewFavorite;
use crate::schema::favorites;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = ShortRecipe),
        (status = 400, description = "Already in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    diesel::insert_into(favorites::table)
        .values(&NewFavorite {
            user_id: user.id,
            recipe_id: recipe.id,
        })
        .execute(&mut conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::bad_request("Recipe is already in favorites")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::debug!(user_id = user.id, recipe_id = recipe.id, "favorite added");

    let view = render_one(&mut conn, Some(user.id), recipe.id, RecipeAction::Favorite)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    let deleted = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user.id))
            .filter(favorites::recipe_id.eq(recipe.id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::bad_request("Recipe is not in favorites"));
    }

    tracing::debug!(user_id = user.id, recipe_id = recipe.id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
