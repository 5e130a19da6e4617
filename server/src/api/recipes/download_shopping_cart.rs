use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::{ingredients, recipe_ingredients, shopping_cart};
use axum::{extract::State, http::header, response::IntoResponse};
use diesel::prelude::*;
use foodgram_core::shopping_list::{CartIngredient, ShoppingList, REPORT_FILENAME};
use std::sync::Arc;

/// Every recipe-ingredient row reachable from the user's cart. A recipe
/// appears in a cart at most once, so each row is counted once.
pub fn cart_ingredients(
    conn: &mut PgConnection,
    user_id: i32,
) -> QueryResult<Vec<CartIngredient>> {
    let rows: Vec<(String, String, i32)> = shopping_cart::table
        .inner_join(
            recipe_ingredients::table
                .on(recipe_ingredients::recipe_id.eq(shopping_cart::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
        .filter(shopping_cart::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, amount)| CartIngredient::new(name, measurement_unit, amount))
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let list = ShoppingList::aggregate(cart_ingredients(&mut conn, user.id)?);
    tracing::info!(user_id = user.id, lines = list.len(), "shopping list generated");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        list.render_report(),
    ))
}
