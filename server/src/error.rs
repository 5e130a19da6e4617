use crate::api::ErrorResponse;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foodgram_core::image::ImageError;
use foodgram_core::pagination::PaginationError;
use foodgram_core::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database connection failed")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::Image(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Pagination(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Pool(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Database(diesel::result::Error::NotFound) => "Not found".to_string(),
            ApiError::Pool(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::NoTags).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PaginationError::InvalidPage).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(diesel::result::Error::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(diesel::result::Error::RollbackTransaction).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_validation_message_is_exposed() {
        assert_eq!(
            ApiError::from(ValidationError::DuplicateIngredient(4)).to_string(),
            "Ingredient 4 is listed more than once"
        );
    }
}
