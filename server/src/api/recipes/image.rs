use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use diesel::prelude::*;
use foodgram_core::image::DecodedImage;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/image/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*", body = Vec<u8>),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let (data, content_type): (Vec<u8>, String) = recipes::table
        .find(id)
        .select((recipes::image, recipes::image_content_type))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))?;
    let image = DecodedImage { content_type, data };

    Ok((
        [
            (header::CONTENT_DISPOSITION, content_disposition(id, &image)),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
            (header::CONTENT_TYPE, image.content_type),
        ],
        image.data,
    ))
}

fn content_disposition(id: i32, image: &DecodedImage) -> String {
    format!("inline; filename=\"recipe-{id}.{}\"", image.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_uses_extension() {
        let image = DecodedImage {
            content_type: "image/jpeg".to_string(),
            data: vec![0xff, 0xd8],
        };
        assert_eq!(
            content_disposition(7, &image),
            "inline; filename=\"recipe-7.jpeg\""
        );

        let image = DecodedImage {
            content_type: "application/octet-stream".to_string(),
            data: Vec::new(),
        };
        assert_eq!(
            content_disposition(7, &image),
            "inline; filename=\"recipe-7.bin\""
        );
    }
}
