use crate::api::extract::ApiJson;
use super::representation::{render_one, RecipeAction, RecipeResponse};
use super::write::{check_references, ingredient_amounts, replace_components, IngredientAmountRequest};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::NewRecipe;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::image::decode_data_url;
use foodgram_core::validation::{validate_recipe, RecipeInput};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    /// Tag IDs
    pub tags: Vec<i32>,
    /// `data:image/<type>;base64,<payload>`
    pub image: String,
    pub name: String,
    pub text: String,
    /// Minutes, 1 to 32000
    pub cooking_time: i32,
}

#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = request.name.trim();
    let amounts = ingredient_amounts(&request.ingredients);

    validate_recipe(&RecipeInput {
        name: Some(name),
        text: Some(request.text.as_str()),
        cooking_time: Some(request.cooking_time),
        tags: &request.tags,
        ingredients: &amounts,
    })?;
    let image = decode_data_url(&request.image)?;

    let mut conn = pool.get()?;
    check_references(&mut conn, &request.tags, &amounts)?;

    let recipe_id: i32 = conn.transaction(|conn| {
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name,
                text: &request.text,
                cooking_time: request.cooking_time,
                image: &image.data,
                image_content_type: &image.content_type,
            })
            .returning(recipes::id)
            .get_result(conn)?;

        replace_components(conn, recipe_id, &request.tags, &amounts)?;

        Ok::<_, diesel::result::Error>(recipe_id)
    })?;

    tracing::info!(user_id = user.id, recipe_id, "recipe created");

    let view = render_one(&mut conn, Some(user.id), recipe_id, RecipeAction::Create)?;
    Ok((StatusCode::CREATED, Json(view)))
}
