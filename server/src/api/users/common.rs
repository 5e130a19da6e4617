use crate::models::User;
use crate::schema::subscriptions;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

/// Public user fields as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user; always false for anonymous viewers
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Which of `author_ids` the viewer is subscribed to.
pub fn followed_authors(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    author_ids: &[i32],
) -> QueryResult<HashSet<i32>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let followed: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)?;

    Ok(followed.into_iter().collect())
}

pub fn render_users(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    users: Vec<User>,
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
    let followed = followed_authors(conn, viewer, &ids)?;

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserResponse::new(user, is_subscribed)
        })
        .collect())
}

pub fn render_user(
    conn: &mut PgConnection,
    viewer: Option<i32>,
    user: User,
) -> QueryResult<UserResponse> {
    let mut rendered = render_users(conn, viewer, vec![user])?;
    rendered.pop().ok_or(diesel::result::Error::NotFound)
}
