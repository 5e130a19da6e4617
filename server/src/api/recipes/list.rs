use super::filters::RecipeFilters;
use super::representation::{render, RecipeAction, RecipeView};
use crate::api::pagination::page_links;
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::config::Settings;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags};
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use foodgram_core::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const RECIPES_PATH: &str = "/api/recipes/";

/// Query parameters of the recipe list, for documentation. The handler
/// parses the raw query itself so `tags` can repeat.
#[derive(Debug, Deserialize, IntoParams)]
#[allow(dead_code)]
pub struct ListRecipesParams {
    /// Only recipes by this author
    pub author: Option<i32>,
    /// Tag slug; repeat to match any of several tags
    pub tags: Option<Vec<String>>,
    /// 1 for the viewer's favorites only, 0 to exclude them
    pub is_favorited: Option<u8>,
    /// 1 for recipes in the viewer's cart only, 0 to exclude them
    pub is_in_shopping_cart: Option<u8>,
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Page size (default 6, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipePage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecipeView>,
}

fn filtered_query(filters: &RecipeFilters, viewer: Option<i32>) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = filters.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filters.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filters.tags.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if let Some(viewer) = viewer {
        if let Some(wanted) = filters.is_favorited {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer))
                .select(favorites::recipe_id);
            query = if wanted {
                query.filter(recipes::id.eq_any(favorited))
            } else {
                query.filter(recipes::id.ne_all(favorited))
            };
        }
        if let Some(wanted) = filters.is_in_shopping_cart {
            let in_cart = shopping_cart::table
                .filter(shopping_cart::user_id.eq(viewer))
                .select(shopping_cart::recipe_id);
            query = if wanted {
                query.filter(recipes::id.eq_any(in_cart))
            } else {
                query.filter(recipes::id.ne_all(in_cart))
            };
        }
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = RecipePage),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(settings): State<Arc<Settings>>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let filters = RecipeFilters::parse(raw_query.as_deref());
    let request = PageRequest::new(filters.page, filters.limit, settings.default_page_size)?;
    let viewer_id = viewer.id();

    if viewer_id.is_none() && filters.excludes_anonymous() {
        let links = page_links(&request, RECIPES_PATH, raw_query.as_deref(), 0)?;
        return Ok(Json(RecipePage {
            count: 0,
            next: links.next,
            previous: links.previous,
            results: Vec::new(),
        }));
    }

    let mut conn = pool.get()?;

    let count: i64 = filtered_query(&filters, viewer_id)
        .count()
        .get_result(&mut conn)?;
    let links = page_links(&request, RECIPES_PATH, raw_query.as_deref(), count)?;

    let rows: Vec<Recipe> = filtered_query(&filters, viewer_id)
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .limit(request.limit)
        .offset(request.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let results = render(&mut conn, viewer_id, rows, RecipeAction::List)?;

    Ok(Json(RecipePage {
        count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}
