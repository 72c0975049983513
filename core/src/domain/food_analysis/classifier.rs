use crate::domain::food_analysis::{
    entities::AnalysisResult,
    value_objects::{
        IngredientView, ProductInfo, RenderableResult, ResultSection, SafetyBanner, SafetyTier,
        TierGroup,
    },
};

pub fn allergen_count_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} allergen{plural} detected")
}

/// A confirmed allergen always wins, whatever the model put in `safe`.
pub fn safety_banner(result: &AnalysisResult) -> SafetyBanner {
    if !result.detected_allergens.is_empty() {
        SafetyBanner::ContainsAllergens
    } else if !result.potential_allergens.is_empty() && result.safe {
        SafetyBanner::PotentialAllergens
    } else {
        SafetyBanner::Safe
    }
}

fn same_ingredient(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn listed(list: &[String], ingredient: &str) -> bool {
    list.iter().any(|entry| same_ingredient(entry, ingredient))
}

/// Tier of one ingredient, checked unsafe first, then warning, then safe.
pub fn ingredient_tier(result: &AnalysisResult, ingredient: &str) -> SafetyTier {
    if listed(&result.unsafe_ingredients, ingredient) {
        SafetyTier::Unsafe
    } else if listed(&result.warning_ingredients, ingredient) {
        SafetyTier::Warning
    } else if listed(&result.safe_ingredients, ingredient) {
        SafetyTier::Safe
    } else {
        SafetyTier::Unclassified
    }
}

pub fn product_info(result: &AnalysisResult) -> Option<ProductInfo> {
    let name = result.product_name().map(str::to_string);
    let brand = result.brand().map(str::to_string);

    if name.is_none() && brand.is_none() {
        return None;
    }

    Some(ProductInfo { name, brand })
}

pub fn classify(result: &AnalysisResult) -> RenderableResult {
    let allergen_count = result.detected_allergens.len();
    let mut sections = Vec::new();

    if !result.detected_allergens.is_empty() {
        sections.push(ResultSection::DetectedAllergens(
            result.detected_allergens.clone(),
        ));
    }

    if !result.potential_allergens.is_empty() {
        sections.push(ResultSection::PotentialAllergens(
            result.potential_allergens.clone(),
        ));
    }

    let groups: Vec<TierGroup> = [
        (SafetyTier::Safe, &result.safe_ingredients),
        (SafetyTier::Warning, &result.warning_ingredients),
        (SafetyTier::Unsafe, &result.unsafe_ingredients),
    ]
    .into_iter()
    .filter(|(_, ingredients)| !ingredients.is_empty())
    .map(|(tier, ingredients)| TierGroup {
        tier,
        ingredients: ingredients.clone(),
    })
    .collect();

    if !groups.is_empty() {
        sections.push(ResultSection::IngredientCategories(groups));
    }

    if !result.ingredients.is_empty() {
        sections.push(ResultSection::AllIngredients(
            result
                .ingredients
                .iter()
                .map(|name| IngredientView {
                    name: name.clone(),
                    tier: ingredient_tier(result, name),
                })
                .collect(),
        ));
    }

    if !result.analysis.trim().is_empty() {
        sections.push(ResultSection::Analysis(result.analysis.clone()));
    }

    RenderableResult {
        banner: safety_banner(result),
        allergen_count,
        allergen_count_label: allergen_count_label(allergen_count),
        product: product_info(result),
        sections,
    }
}
