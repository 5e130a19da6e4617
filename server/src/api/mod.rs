pub mod auth;
pub mod extract;
pub mod ingredients;
pub mod pagination;
pub mod recipes;
pub mod tags;
pub mod users;

use crate::AppState;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// All API routes. Authentication is enforced per handler through the
/// `AuthUser` / `MaybeAuthUser` extractors.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(tags::router())
        .merge(ingredients::router())
        .merge(recipes::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Foodgram API", description = "Recipes, favorites, subscriptions and shopping lists"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key>",
            ))),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db::DbPool;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::PgConnection;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    /// A pool whose connections always fail, quickly. Requests rejected before
    /// any query never notice; anything that queries gets a pool error.
    fn offline_state() -> AppState {
        let manager = ConnectionManager::<PgConnection>::new("postgres://127.0.0.1:1/foodgram_test");
        let pool: DbPool = Pool::builder()
            .connection_timeout(Duration::from_millis(300))
            .build_unchecked(manager);
        AppState {
            pool: Arc::new(pool),
            settings: Arc::new(Settings::default()),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router()
            .with_state(offline_state())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in [
            "/api/auth/token/login/",
            "/api/auth/token/logout/",
            "/api/users/",
            "/api/users/me/",
            "/api/users/set_password/",
            "/api/users/subscriptions/",
            "/api/users/{id}/",
            "/api/users/{id}/subscribe/",
            "/api/tags/",
            "/api/tags/{id}/",
            "/api/ingredients/",
            "/api/ingredients/{id}/",
            "/api/recipes/",
            "/api/recipes/{id}/",
            "/api/recipes/{id}/image/",
            "/api/recipes/{id}/favorite/",
            "/api/recipes/{id}/shopping_cart/",
            "/api/recipes/download_shopping_cart/",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn test_download_requires_token() {
        let (status, body) = send(
            Request::get("/api/recipes/download_shopping_cart/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication credentials were not provided");
    }

    #[tokio::test]
    async fn test_me_rejects_malformed_header() {
        let (status, body) = send(
            Request::get("/api/users/me/")
                .header(header::AUTHORIZATION, "Basic abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Authorization header format");
    }

    #[tokio::test]
    async fn test_recipe_create_requires_token() {
        let (status, _) = send(
            Request::post("/api/recipes/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_subscribe_requires_token() {
        let (status, _) = send(
            Request::post("/api/users/7/subscribe/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_favorites_filter_is_empty() {
        let (status, body) = send(
            Request::get("/api/recipes/?is_favorited=1&tags=lunch")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "count": 0,
                "next": null,
                "previous": null,
                "results": []
            })
        );
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_not_found() {
        let (status, body) = send(
            Request::get("/api/recipes/?is_in_shopping_cart=1&page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Invalid page");
    }

    #[tokio::test]
    async fn test_page_zero_is_not_found() {
        let (status, body) = send(
            Request::get("/api/users/?page=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Invalid page");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = send(
            Request::post("/api/users/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("missing field `email`"), "{message}");
    }

    #[tokio::test]
    async fn test_login_without_json_content_type_is_bad_request() {
        let (status, body) = send(
            Request::post("/api/auth/token/login/")
                .body(Body::from(r#"{"email":"a@b.c","password":"x"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_query_is_bad_request() {
        let (status, body) = send(
            Request::get("/api/users/?page=last")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_session_store_failure_is_server_error() {
        let (status, body) = send(
            Request::get("/api/users/me/")
                .header(header::AUTHORIZATION, "Token abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");

        let (status, _) = send(Request::get("/api/tags/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
