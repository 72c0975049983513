use std::{fs, path::Path};

use tracing::{debug, error};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{encoding::encode_data_url, validation::is_valid_image_type},
};

/// Media type for a file extension, `application/octet-stream` when unknown.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Reads an image from disk and returns it as a `data:` URL.
pub fn load_image_file(path: impl AsRef<Path>) -> Result<String, CoreError> {
    let path = path.as_ref();
    let media_type = media_type_for_path(path);

    if !is_valid_image_type(media_type) {
        return Err(CoreError::InvalidImageType);
    }

    let bytes = fs::read(path).map_err(|e| {
        error!(path = %path.display(), "Error reading image file: {}", e);
        CoreError::ImageRead
    })?;

    debug!(path = %path.display(), media_type, size = bytes.len(), "Image file loaded");
    Ok(encode_data_url(media_type, &bytes))
}
