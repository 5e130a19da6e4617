use crate::api::extract::ApiQuery;
use crate::api::pagination::{page_links, PageParams};
use crate::api::recipes::representation::{
    recipes_by_author, render, RecipeAction, RecipeView, ShortRecipe,
};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Settings;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::{subscriptions, users};
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const SUBSCRIPTIONS_PATH: &str = "/api/users/subscriptions/";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitParams {
    /// Maximum number of recipes embedded per author
    pub recipes_limit: Option<i64>,
}

/// An author the viewer follows, with a preview of their recipes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    /// Newest first, truncated to `recipes_limit`
    #[schema(value_type = Vec<ShortRecipe>)]
    pub recipes: Vec<RecipeView>,
    /// Total number of recipes by this author
    pub recipes_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<SubscriptionResponse>,
}

/// Render authors followed by `viewer`.
pub fn render_subscriptions(
    conn: &mut PgConnection,
    viewer: i32,
    authors: Vec<User>,
    recipes_limit: Option<i64>,
) -> QueryResult<Vec<SubscriptionResponse>> {
    let ids: Vec<i32> = authors.iter().map(|author| author.id).collect();
    let mut recipes = recipes_by_author(conn, &ids)?;

    let mut rendered = Vec::with_capacity(authors.len());
    for author in authors {
        let mut previews = recipes.remove(&author.id).unwrap_or_default();
        let recipes_count = previews.len() as i64;
        if let Some(limit) = recipes_limit {
            previews.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        rendered.push(SubscriptionResponse {
            recipes: render(conn, Some(viewer), previews, RecipeAction::Subscription)?,
            email: author.email,
            id: author.id,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes_count,
        });
    }
    Ok(rendered)
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = "users",
    params(PageParams, RecipesLimitParams),
    responses(
        (status = 200, description = "Authors the user follows", body = SubscriptionPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(settings): State<Arc<Settings>>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(limits): ApiQuery<RecipesLimitParams>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let request = params.request(settings.default_page_size)?;
    let mut conn = pool.get()?;

    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;
    let links = page_links(&request, SUBSCRIPTIONS_PATH, raw_query.as_deref(), count)?;

    let authors: Vec<User> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::user_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = render_subscriptions(&mut conn, user.id, authors, limits.recipes_limit)?;

    Ok(Json(SubscriptionPage {
        count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;
    use chrono::Utc;

    #[test]
    fn test_subscription_previews_use_short_form() {
        let recipe = Recipe {
            id: 3,
            author_id: 9,
            name: "Pelmeni".to_string(),
            text: "Fold and boil".to_string(),
            cooking_time: 40,
            pub_date: Utc::now(),
        };
        assert_eq!(
            RecipeAction::Subscription.representation(),
            crate::api::recipes::representation::Representation::Short
        );

        let response = SubscriptionResponse {
            email: "chef@example.com".to_string(),
            id: 9,
            username: "chef".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            is_subscribed: true,
            recipes: vec![RecipeView::Short(ShortRecipe::from(recipe))],
            recipes_count: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["recipes"],
            serde_json::json!([{
                "id": 3,
                "name": "Pelmeni",
                "image": "/api/recipes/3/image/",
                "cooking_time": 40
            }])
        );
    }
}
