//! Recipe rendering.
//!
//! Endpoints never build recipe JSON themselves. They name the action they
//! perform and [`render`] picks the matching representation: the full
//! read form with nested author/tags/ingredients and viewer flags, or the
//! short `{id, name, image, cooking_time}` form used by favorites, the cart
//! and subscription previews.

use crate::api::tags::TagResponse;
use crate::api::users::common::{render_users, UserResponse};
use crate::error::ApiError;
use crate::models::{Recipe, Tag, User};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags, users,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeAction {
    List,
    Retrieve,
    Create,
    Update,
    Favorite,
    ShoppingCart,
    Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Full,
    Short,
}

impl RecipeAction {
    pub fn representation(self) -> Representation {
        match self {
            RecipeAction::List
            | RecipeAction::Retrieve
            | RecipeAction::Create
            | RecipeAction::Update => Representation::Full,
            RecipeAction::Favorite | RecipeAction::ShoppingCart | RecipeAction::Subscription => {
                Representation::Short
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// URL of the recipe image
    pub image: String,
    pub text: String,
    /// Minutes
    pub cooking_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShortRecipe {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for ShortRecipe {
    fn from(recipe: Recipe) -> Self {
        Self {
            image: image_url(recipe.id),
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RecipeView {
    Full(RecipeResponse),
    Short(ShortRecipe),
}

pub fn image_url(recipe_id: i32) -> String {
    format!("/api/recipes/{recipe_id}/image/")
}

/// Recipes among `recipe_ids` that `viewer` has in the given association table.
macro_rules! marked_by_viewer {
    ($table:ident, $conn:expr, $viewer:expr, $ids:expr) => {{
        let marked: Vec<i32> = $table::table
            .filter($table::user_id.eq($viewer))
            .filter($table::recipe_id.eq_any($ids))
            .select($table::recipe_id)
            .load($conn)?;
        marked.into_iter().collect::<HashSet<i32>>()
    }};
}

/// Render recipes in the full form, batching every lookup across the page.
pub fn load_full(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    rows: Vec<Recipe>,
) -> QueryResult<Vec<RecipeResponse>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|recipe| recipe.id).collect();

    let mut author_ids: Vec<i32> = rows.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let author_rows: Vec<User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?;
    let authors: HashMap<i32, UserResponse> = render_users(conn, viewer, author_rows)?
        .into_iter()
        .map(|author| (author.id, author))
        .collect();

    let tag_rows: Vec<(i32, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .order(tags::id.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    let mut tags_by_recipe: HashMap<i32, Vec<TagResponse>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(TagResponse::from(tag));
    }

    let ingredient_rows: Vec<(i32, i32, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientResponse>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientResponse {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart) = match viewer {
        Some(viewer) => (
            marked_by_viewer!(favorites, conn, viewer, &ids),
            marked_by_viewer!(shopping_cart, conn, viewer, &ids),
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    rows.into_iter()
        .map(|recipe| {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or(diesel::result::Error::NotFound)?;
            Ok(RecipeResponse {
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                image: image_url(recipe.id),
                author,
                id: recipe.id,
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            })
        })
        .collect()
}

pub fn load_short(rows: Vec<Recipe>) -> Vec<ShortRecipe> {
    rows.into_iter().map(ShortRecipe::from).collect()
}

/// Recipes of each author, newest first.
pub fn recipes_by_author(
    conn: &mut PgConnection,
    author_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<Recipe>>> {
    if author_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<Recipe> = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .select(Recipe::as_select())
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<Recipe>> = HashMap::new();
    for recipe in rows {
        grouped.entry(recipe.author_id).or_default().push(recipe);
    }
    Ok(grouped)
}

pub fn render(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    rows: Vec<Recipe>,
    action: RecipeAction,
) -> QueryResult<Vec<RecipeView>> {
    Ok(match action.representation() {
        Representation::Full => load_full(conn, viewer, rows)?
            .into_iter()
            .map(RecipeView::Full)
            .collect(),
        Representation::Short => load_short(rows)
            .into_iter()
            .map(RecipeView::Short)
            .collect(),
    })
}

pub fn find_recipe(conn: &mut PgConnection, id: i32) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

pub fn render_one(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    id: i32,
    action: RecipeAction,
) -> Result<RecipeView, ApiError> {
    let recipe = find_recipe(conn, id)?;
    render(conn, viewer, vec![recipe], action)?
        .pop()
        .ok_or(ApiError::NotFound("Recipe"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_action_representation() {
        for action in [
            RecipeAction::List,
            RecipeAction::Retrieve,
            RecipeAction::Create,
            RecipeAction::Update,
        ] {
            assert_eq!(action.representation(), Representation::Full);
        }
        for action in [
            RecipeAction::Favorite,
            RecipeAction::ShoppingCart,
            RecipeAction::Subscription,
        ] {
            assert_eq!(action.representation(), Representation::Short);
        }
    }

    #[test]
    fn test_short_recipe_json() {
        let recipe = Recipe {
            id: 12,
            author_id: 1,
            name: "Borscht".to_string(),
            text: "Boil beets".to_string(),
            cooking_time: 90,
            pub_date: Utc::now(),
        };
        let view = RecipeView::Short(ShortRecipe::from(recipe));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 12,
                "name": "Borscht",
                "image": "/api/recipes/12/image/",
                "cooking_time": 90
            })
        );
    }
}
