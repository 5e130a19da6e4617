use crate::error::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags};
use diesel::prelude::*;
use foodgram_core::validation::IngredientAmount;
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

/// One `{id, amount}` entry of a recipe write request
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: i32,
    pub amount: i32,
}

pub fn ingredient_amounts(request: &[IngredientAmountRequest]) -> Vec<IngredientAmount> {
    request
        .iter()
        .map(|entry| IngredientAmount {
            id: entry.id,
            amount: entry.amount,
        })
        .collect()
}

/// Reject ids that do not name an existing tag or ingredient.
pub fn check_references(
    conn: &mut PgConnection,
    tag_ids: &[i32],
    amounts: &[IngredientAmount],
) -> Result<(), ApiError> {
    let known_tags: HashSet<i32> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();
    if let Some(missing) = tag_ids.iter().find(|id| !known_tags.contains(id)) {
        return Err(ApiError::bad_request(format!("Tag {missing} does not exist")));
    }

    let ingredient_ids: Vec<i32> = amounts.iter().map(|entry| entry.id).collect();
    let known_ingredients: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .select(ingredients::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();
    if let Some(missing) = ingredient_ids
        .iter()
        .find(|id| !known_ingredients.contains(id))
    {
        return Err(ApiError::bad_request(format!(
            "Ingredient {missing} does not exist"
        )));
    }

    Ok(())
}

/// Replace the recipe's tag and ingredient sets. Call inside a transaction.
pub fn replace_components(
    conn: &mut PgConnection,
    recipe_id: i32,
    tag_ids: &[i32],
    amounts: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let new_tags: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&new_tags)
        .execute(conn)?;

    let new_ingredients: Vec<NewRecipeIngredient> = amounts
        .iter()
        .map(|entry| NewRecipeIngredient {
            recipe_id,
            ingredient_id: entry.id,
            amount: entry.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&new_ingredients)
        .execute(conn)?;

    Ok(())
}
