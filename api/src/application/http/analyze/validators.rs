use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Both fields are optional at the JSON level so that a missing field and an
/// empty one are rejected the same way.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct AnalyzeRequestBody {
    /// Label photo as a `data:image/...;base64,` URL or bare base64.
    #[validate(required, length(min = 1))]
    pub image: Option<String>,

    /// Free-text allergy list, e.g. "peanuts, shellfish".
    #[validate(required, length(min = 1))]
    pub allergies: Option<String>,
}
