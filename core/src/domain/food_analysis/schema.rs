use serde_json::json;

/// Fields the model must always return.
pub const ANALYSIS_RESULT_FIELDS: [&str; 10] = [
    "safe",
    "food_name",
    "food_brand",
    "detected_allergens",
    "potential_allergens",
    "safe_ingredients",
    "warning_ingredients",
    "unsafe_ingredients",
    "ingredients",
    "analysis",
];

fn string_list(description: &str) -> serde_json::Value {
    json!({
        "type": "array",
        "description": description,
        "items": { "type": "string" }
    })
}

/// Returns the JSON schema for allergen analysis LLM responses
pub fn get_analysis_result_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "safe": {
                "type": "boolean",
                "description": "Whether the food is safe for the user to consume"
            },
            "food_name": {
                "type": "string",
                "description": "Product name as printed on the package, or \"Unknown Product\""
            },
            "food_brand": {
                "type": "string",
                "description": "Brand or manufacturer as printed on the package, or \"Unknown Brand\""
            },
            "detected_allergens": string_list(
                "Allergens found that match the user's allergies"
            ),
            "potential_allergens": string_list(
                "Ingredients that might contain allergens or are uncertain"
            ),
            "safe_ingredients": string_list(
                "Ingredients that are safe for the user's allergies"
            ),
            "warning_ingredients": string_list(
                "Ingredients that might be problematic or uncertain"
            ),
            "unsafe_ingredients": string_list(
                "Ingredients that are definitely unsafe for the user's allergies"
            ),
            "ingredients": string_list("All ingredients detected in the image"),
            "analysis": {
                "type": "string",
                "description": "Brief explanation of the analysis and recommendations"
            }
        },
        "required": ANALYSIS_RESULT_FIELDS,
        "propertyOrdering": ANALYSIS_RESULT_FIELDS
    })
}
