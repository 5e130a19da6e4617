use crate::api::extract::ApiQuery;
use super::common::{render_users, UserResponse};
use crate::api::pagination::{page_links, PageParams};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::config::Settings;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

pub const USERS_PATH: &str = "/api/users/";

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<UserResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = UserPage),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    )
)]
pub async fn list_users(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(settings): State<Arc<Settings>>,
    ApiQuery(params): ApiQuery<PageParams>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let request = params.request(settings.default_page_size)?;
    let mut conn = pool.get()?;

    let count: i64 = users::table.count().get_result(&mut conn)?;
    let links = page_links(&request, USERS_PATH, raw_query.as_deref(), count)?;

    let page: Vec<User> = users::table
        .order(users::id.asc())
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = render_users(&mut conn, viewer.id(), page)?;

    Ok(Json(UserPage {
        count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}
