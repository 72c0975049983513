//! Instruction text sent to the vision model.
//!
//! Everything here is plain templating over the user's allergy text, so the
//! wording can change without touching the inference adapter or the
//! classifier. Bump [`PROMPT_VERSION`] whenever it does.

use crate::domain::food_analysis::entities::{UNKNOWN_BRAND, UNKNOWN_PRODUCT};

pub const PROMPT_VERSION: &str = "3";

/// Task description sent as the user turn next to the image.
pub const ANALYSIS_TASK_INSTRUCTION: &str = "Please analyze this food ingredient label/package and tell me:
1. If it's safe for me to consume given my specific allergies
2. What allergens you detected that match my allergies (detected_allergens)
3. What ingredients might potentially contain allergens or are uncertain (potential_allergens) - these could include unclear ingredients, \"may contain\" warnings, or ingredients that could be derived from allergens
4. Categorize ALL ingredients into safety levels:
   - safe_ingredients: Ingredients that are completely safe for the user's allergies
   - warning_ingredients: Ingredients that might be problematic, uncertain, or have \"may contain\" warnings
   - unsafe_ingredients: Ingredients that definitely contain the user's allergens
5. List all ingredients you can identify in the image (ingredients)
6. Provide a detailed analysis and safety recommendation (analysis)

Please be thorough in checking for hidden allergens and cross-contamination warnings like \"may contain\" statements. Make sure every ingredient is categorized into one of the three safety levels.";

#[derive(Debug, Clone, Default)]
pub struct PromptOptions<'a> {
    pub user_allergies: &'a str,
    pub user_message: Option<&'a str>,
}

pub fn create_system_message(allergies: &str) -> String {
    format!(
        "You are an expert food safety analyst specializing in allergen detection.

USER'S ALLERGIES: {allergies}

PRODUCT IDENTIFICATION:
- Look for the food product name (what the food actually is)
- Look for the brand name or manufacturer name
- If the product name is not clearly visible or readable, use \"{UNKNOWN_PRODUCT}\"
- If the brand name is not clearly visible or readable, use \"{UNKNOWN_BRAND}\"
- Only include what is actually visible in the image - do not guess or infer

ALLERGEN ANALYSIS:
- Be extremely thorough in checking for allergens
- Direct allergen ingredients
- Check for alternative names of allergens, including scientific names (e.g., casein for dairy, albumin for eggs)
- \"May contain\" warnings
- Cross-contamination risks
- If unsure about safety, err on the side of caution

INGREDIENT CATEGORIZATION:
- Place every ingredient in exactly one of: safe_ingredients, warning_ingredients, unsafe_ingredients

Always prioritize user safety and be cautious in your recommendations."
    )
}

/// System message followed by the caller's message, or the default six-point
/// task when none is given.
pub fn create_analysis_prompt(options: PromptOptions<'_>) -> String {
    let system_message = create_system_message(options.user_allergies);
    let user_message = options.user_message.unwrap_or(ANALYSIS_TASK_INSTRUCTION);

    format!("{system_message}\n\n{user_message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_embeds_allergies() {
        let message = create_system_message("peanuts, shellfish, dairy");

        assert!(message.contains("You are an expert food safety analyst"));
        assert!(message.contains("USER'S ALLERGIES: peanuts, shellfish, dairy"));
        assert!(message.contains("Direct allergen ingredients"));
        assert!(message.contains("Cross-contamination risks"));
        assert!(message.contains("\"Unknown Product\""));
        assert!(message.contains("\"Unknown Brand\""));
    }

    #[test]
    fn test_system_message_with_empty_allergies() {
        let message = create_system_message("");
        assert!(message.contains("USER'S ALLERGIES: \n"));
    }

    #[test]
    fn test_system_message_is_deterministic() {
        assert_eq!(create_system_message("soy"), create_system_message("soy"));
    }

    #[test]
    fn test_analysis_prompt_uses_default_task() {
        let prompt = create_analysis_prompt(PromptOptions {
            user_allergies: "gluten, soy",
            user_message: None,
        });

        assert!(prompt.contains("USER'S ALLERGIES: gluten, soy"));
        assert_eq!(prompt.matches("gluten, soy").count(), 1);
        assert!(prompt.contains("Be extremely thorough"));
        assert!(prompt.contains("alternative names of allergens"));
        assert!(prompt.contains("Please analyze this food ingredient"));
        assert!(prompt.contains("1. If it's safe for me to consume"));
        assert!(prompt.contains("6. Provide a detailed analysis"));
    }

    #[test]
    fn test_analysis_prompt_uses_custom_message() {
        let prompt = create_analysis_prompt(PromptOptions {
            user_allergies: "shellfish",
            user_message: Some("Custom analysis request"),
        });

        assert!(prompt.ends_with("\n\nCustom analysis request"));
        assert!(!prompt.contains("Please analyze this food ingredient"));
    }
}
