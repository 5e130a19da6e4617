use crate::api::extract::ApiJson;
use super::representation::{find_recipe, render_one, RecipeAction, RecipeResponse};
use super::write::{check_references, ingredient_amounts, replace_components, IngredientAmountRequest};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::image::decode_data_url;
use foodgram_core::validation::{validate_recipe, RecipeInput};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Partial update. Tags and ingredients are required and replace the
/// previous sets; omitted scalar fields keep their current values.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeChanges<'a> {
    name: Option<&'a str>,
    text: Option<&'a str>,
    cooking_time: Option<i32>,
    image: Option<&'a [u8]>,
    image_content_type: Option<&'a str>,
}

impl RecipeChanges<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
            && self.image.is_none()
    }
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, id)?;
    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    let name = request.name.as_deref().map(str::trim);
    let amounts = ingredient_amounts(&request.ingredients);

    validate_recipe(&RecipeInput {
        name,
        text: request.text.as_deref(),
        cooking_time: request.cooking_time,
        tags: &request.tags,
        ingredients: &amounts,
    })?;
    let image = request.image.as_deref().map(decode_data_url).transpose()?;

    check_references(&mut conn, &request.tags, &amounts)?;

    let changes = RecipeChanges {
        name,
        text: request.text.as_deref(),
        cooking_time: request.cooking_time,
        image: image.as_ref().map(|image| image.data.as_slice()),
        image_content_type: image.as_ref().map(|image| image.content_type.as_str()),
    };

    conn.transaction(|conn| {
        if !changes.is_empty() {
            diesel::update(recipes::table.find(recipe.id))
                .set(&changes)
                .execute(conn)?;
        }
        replace_components(conn, recipe.id, &request.tags, &amounts)
    })?;

    tracing::info!(user_id = user.id, recipe_id = recipe.id, "recipe updated");

    let view = render_one(&mut conn, Some(user.id), recipe.id, RecipeAction::Update)?;
    Ok(Json(view))
}
