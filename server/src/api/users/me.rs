use super::common::UserResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/users/me/",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token_auth" = []))
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    // Nobody can subscribe to themselves.
    Json(UserResponse::new(user, false))
}
