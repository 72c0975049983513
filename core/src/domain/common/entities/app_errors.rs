use thiserror::Error;

/// Message shown to a user when anything past input validation fails.
pub const ANALYSIS_RETRY_MESSAGE: &str = "Error analyzing ingredients. Please try again.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Please upload an image")]
    MissingImage,

    #[error("Please enter your allergies")]
    MissingAllergies,

    #[error("Please select a valid image file")]
    InvalidImageType,

    #[error("Failed to read the image file")]
    ImageRead,

    #[error("Image and allergies are required")]
    MissingRequiredFields,

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Model response does not match the analysis schema: {0}")]
    SchemaValidation(String),

    #[error("An analysis is already in progress")]
    AnalysisInFlight,

    #[error("The analysis was cancelled")]
    AnalysisCancelled,

    #[error("Preference storage error: {0}")]
    PreferenceStorage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl CoreError {
    /// Input errors are caught before any request leaves the client.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingImage
                | CoreError::MissingAllergies
                | CoreError::InvalidImageType
                | CoreError::ImageRead
                | CoreError::MissingRequiredFields
                | CoreError::AnalysisInFlight
        )
    }

    pub fn user_message(&self) -> String {
        if self.is_input_error() {
            self.to_string()
        } else {
            ANALYSIS_RETRY_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_shown_verbatim() {
        assert_eq!(CoreError::MissingImage.user_message(), "Please upload an image");
        assert_eq!(
            CoreError::ImageRead.user_message(),
            "Failed to read the image file"
        );
    }

    #[test]
    fn test_inference_errors_hide_their_cause() {
        let err = CoreError::ExternalServiceError("quota exceeded for key abc".to_string());
        assert_eq!(err.user_message(), ANALYSIS_RETRY_MESSAGE);

        let err = CoreError::SchemaValidation("missing field `safe`".to_string());
        assert!(!err.user_message().contains("safe"));
    }
}
