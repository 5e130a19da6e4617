use crate::api::extract::ApiQuery;
use super::subscriptions::{render_subscriptions, RecipesLimitParams, SubscriptionResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{is_unique_violation, DbPool};
use crate::error::ApiError;
use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

fn find_author(conn: &mut PgConnection, id: i32) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID"),
        RecipesLimitParams
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Already subscribed, or subscribing to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiQuery(limits): ApiQuery<RecipesLimitParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let author = find_author(&mut conn, id)?;

    if author.id == user.id {
        return Err(ApiError::bad_request("You cannot subscribe to yourself"));
    }

    diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            user_id: user.id,
            author_id: author.id,
        })
        .execute(&mut conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::bad_request("You are already subscribed to this user")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!(user_id = user.id, author_id = author.id, "subscribed");

    let mut rendered =
        render_subscriptions(&mut conn, user.id, vec![author], limits.recipes_limit)?;
    let response = rendered
        .pop()
        .ok_or_else(|| ApiError::Internal("Subscription vanished after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.get()?;
    let author = find_author(&mut conn, id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user.id))
            .filter(subscriptions::author_id.eq(author.id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::bad_request("You are not subscribed to this user"));
    }

    tracing::info!(user_id = user.id, author_id = author.id, "unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}
