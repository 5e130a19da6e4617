//! Decoding of recipe images submitted as `data:image/<type>;base64,<payload>`.

use base64::Engine;
use thiserror::Error;

/// Upper bound on a decoded recipe image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image must be a data:image/...;base64 URL")]
    NotDataUrl,

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image is not valid base64")]
    InvalidBase64,

    #[error("Image is empty")]
    Empty,

    #[error("Image exceeds {} bytes", MAX_IMAGE_BYTES)]
    TooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl DecodedImage {
    pub fn extension(&self) -> &str {
        self.content_type
            .strip_prefix("image/")
            .unwrap_or("bin")
    }
}

const SUPPORTED_TYPES: &[&str] = &["png", "jpeg", "jpg", "gif", "webp"];

pub fn decode_data_url(value: &str) -> Result<DecodedImage, ImageError> {
    let rest = value
        .trim()
        .strip_prefix("data:image/")
        .ok_or(ImageError::NotDataUrl)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or(ImageError::NotDataUrl)?;

    let subtype = subtype.to_ascii_lowercase();
    if !SUPPORTED_TYPES.contains(&subtype.as_str()) {
        return Err(ImageError::UnsupportedType(subtype));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageError::InvalidBase64)?;

    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }

    let subtype = if subtype == "jpg" { "jpeg".to_string() } else { subtype };
    Ok(DecodedImage {
        content_type: format!("image/{subtype}"),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_png() {
        let decoded = decode_data_url(&format!("data:image/png;base64,{PIXEL}")).unwrap();
        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(decoded.extension(), "png");
        assert_eq!(&decoded.data[1..4], b"PNG");
    }

    #[test]
    fn test_jpg_is_normalized() {
        let decoded = decode_data_url(&format!("data:image/JPG;base64,{PIXEL}")).unwrap();
        assert_eq!(decoded.content_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_plain_url() {
        assert_eq!(
            decode_data_url("https://example.com/cake.png"),
            Err(ImageError::NotDataUrl)
        );
    }

    #[test]
    fn test_rejects_unsupported_type() {
        assert_eq!(
            decode_data_url(&format!("data:image/svg+xml;base64,{PIXEL}")),
            Err(ImageError::UnsupportedType("svg+xml".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_payload() {
        assert_eq!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(ImageError::InvalidBase64)
        );
        assert_eq!(
            decode_data_url("data:image/png;base64,"),
            Err(ImageError::Empty)
        );
    }
}
