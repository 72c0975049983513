use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::common::entities::app_errors::CoreError;

/// Outcome of the pre-flight check run before an image is encoded or sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn validate_allergies(allergies: &str) -> bool {
    !allergies.trim().is_empty()
}

pub fn validate_image_data(image: Option<&str>) -> bool {
    image.is_some_and(|data| !data.is_empty())
}

/// Image is checked first, so a request missing both reports the image.
pub fn check_analysis_request(image: Option<&str>, allergies: &str) -> Result<(), CoreError> {
    if !validate_image_data(image) {
        return Err(CoreError::MissingImage);
    }

    if !validate_allergies(allergies) {
        return Err(CoreError::MissingAllergies);
    }

    Ok(())
}

pub fn validate_analysis_request(image: Option<&str>, allergies: &str) -> ValidationResult {
    match check_analysis_request(image, allergies) {
        Ok(()) => ValidationResult {
            is_valid: true,
            error: None,
        },
        Err(e) => ValidationResult {
            is_valid: false,
            error: Some(e.to_string()),
        },
    }
}

/// File input boundary: only declared `image/*` media types are accepted.
pub fn is_valid_image_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}
