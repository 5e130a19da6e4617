use crate::api::extract::ApiQuery;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel::sql_types::Text;
use foodgram_core::text::capitalize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    /// Display name, first letter capitalized
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: capitalize(&ingredient.name),
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearchParams {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// `LIKE` pattern for `lower(name)`: lower-cased prefix, wildcards escaped.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = "ingredients",
    params(IngredientSearchParams),
    responses(
        (status = 200, description = "Matching ingredients ordered by name", body = Vec<IngredientResponse>)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<IngredientSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let mut query = ingredients::table
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::id.asc()))
        .into_boxed();

    if let Some(name) = params.name.as_deref().map(str::trim) {
        if !name.is_empty() {
            query = query.filter(lower(ingredients::name).like(prefix_pattern(name)));
        }
    }

    let rows: Vec<Ingredient> = query.load(&mut conn)?;
    let response: Vec<IngredientResponse> =
        rows.into_iter().map(IngredientResponse::from).collect();
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(prefix_pattern("му"), "му%");
        assert_eq!(prefix_pattern("Мука"), "мука%");
        assert_eq!(prefix_pattern("BROWN"), "brown%");
        assert_eq!(prefix_pattern("50%_off"), "50\\%\\_off%");
        assert_eq!(prefix_pattern("a\\b"), "a\\\\b%");
    }

    #[test]
    fn test_name_is_capitalized() {
        let response = IngredientResponse::from(Ingredient {
            id: 3,
            name: "пшеничная мука".to_string(),
            measurement_unit: "г".to_string(),
        });
        assert_eq!(response.name, "Пшеничная мука");
        assert_eq!(response.measurement_unit, "г");
    }
}
