use super::list::IngredientResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient"))?;

    Ok(Json(IngredientResponse::from(ingredient)))
}
