//! Base64 data-URI images.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::ApiError;

/// An uploaded image decoded from a `data:image/<ext>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

pub fn decode_data_uri(value: &str) -> Result<DecodedImage, ApiError> {
    let invalid = || ApiError::validation("image: expected a base64 data URI");

    let (header, payload) = value.split_once(',').ok_or_else(invalid)?;
    let media_type = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(invalid)?;
    let extension = match media_type.to_ascii_lowercase().as_str() {
        "png" => "png",
        "jpg" | "jpeg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        other => {
            return Err(ApiError::validation(format!(
                "image: unsupported image type {other:?}"
            )));
        }
    };
    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }
    Ok(DecodedImage { extension, bytes })
}
