use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

/// Create a session for `user_id` and return the plaintext token. Only its hash is stored.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: i32,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

/// The user owning an unexpired session for `token`, if any.
pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Result<Option<User>, ApiError> {
    let mut conn = pool.get()?;
    let token_hash = hash_token(token);

    let user = sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    Ok(user)
}
