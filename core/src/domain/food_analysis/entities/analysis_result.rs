use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    common::entities::app_errors::CoreError, food_analysis::schema::ANALYSIS_RESULT_FIELDS,
};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Structured verdict returned by the model.
///
/// Every field except `safe`, `detected_allergens`, `ingredients` and
/// `analysis` carries a default so that results produced before the
/// three-tier categorization existed still deserialize. Strict checking of
/// fresh model output happens in [`AnalysisResult::from_model_output`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub safe: bool,
    #[serde(default = "unknown_product")]
    pub food_name: String,
    #[serde(default = "unknown_brand")]
    pub food_brand: String,
    pub detected_allergens: Vec<String>,
    #[serde(default)]
    pub potential_allergens: Vec<String>,
    #[serde(default)]
    pub safe_ingredients: Vec<String>,
    #[serde(default)]
    pub warning_ingredients: Vec<String>,
    #[serde(default)]
    pub unsafe_ingredients: Vec<String>,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub analysis: String,
}

fn unknown_product() -> String {
    UNKNOWN_PRODUCT.to_string()
}

fn unknown_brand() -> String {
    UNKNOWN_BRAND.to_string()
}

/// The only place sentinel strings are compared.
pub fn is_sentinel(value: &str, sentinel: &str) -> bool {
    value == sentinel
}

impl AnalysisResult {
    /// Parses raw model output, requiring every schema field to be present.
    pub fn from_model_output(raw: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| CoreError::SchemaValidation(format!("response is not JSON: {}", e)))?;

        let object = value.as_object().ok_or_else(|| {
            CoreError::SchemaValidation("response is not a JSON object".to_string())
        })?;

        let missing: Vec<&str> = ANALYSIS_RESULT_FIELDS
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect();

        if !missing.is_empty() {
            return Err(CoreError::SchemaValidation(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        serde_json::from_value(value).map_err(|e| CoreError::SchemaValidation(e.to_string()))
    }

    /// Product name, unless the model reported it as unreadable.
    pub fn product_name(&self) -> Option<&str> {
        (!is_sentinel(&self.food_name, UNKNOWN_PRODUCT)).then_some(self.food_name.as_str())
    }

    /// Brand name, unless the model reported it as unreadable.
    pub fn brand(&self) -> Option<&str> {
        (!is_sentinel(&self.food_brand, UNKNOWN_BRAND)).then_some(self.food_brand.as_str())
    }
}
