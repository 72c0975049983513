use crate::domain::{
    common::SafetyNotice,
    food_analysis::value_objects::{RenderableResult, ResultSection},
};

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_list(out: &mut String, items: &[String]) {
    for item in items {
        push_line(out, &format!("  - {item}"));
    }
}

/// Plain-text report of a classified result. Same input, same bytes.
pub fn render_report(view: &RenderableResult) -> String {
    let mut out = String::new();

    push_line(&mut out, view.banner.headline());
    push_line(&mut out, view.banner.message());
    push_line(&mut out, &view.allergen_count_label);

    if let Some(product) = &view.product {
        push_line(&mut out, "\nProduct Information");
        if let Some(brand) = &product.brand {
            push_line(&mut out, &format!("  Brand: {brand}"));
        }
        if let Some(name) = &product.name {
            push_line(&mut out, &format!("  Product: {name}"));
        }
    }

    for section in &view.sections {
        push_line(&mut out, &format!("\n{}", section.title()));
        match section {
            ResultSection::DetectedAllergens(items) | ResultSection::PotentialAllergens(items) => {
                push_list(&mut out, items)
            }
            ResultSection::IngredientCategories(groups) => {
                for group in groups {
                    push_line(
                        &mut out,
                        &format!("  {} ({})", group.tier.as_str(), group.ingredients.len()),
                    );
                    for ingredient in &group.ingredients {
                        push_line(&mut out, &format!("    - {ingredient}"));
                    }
                }
            }
            ResultSection::AllIngredients(ingredients) => {
                for ingredient in ingredients {
                    push_line(
                        &mut out,
                        &format!("  [{}] {}", ingredient.tier.as_str(), ingredient.name),
                    );
                }
            }
            ResultSection::Analysis(text) => {
                for line in text.lines() {
                    push_line(&mut out, &format!("  {line}"));
                }
            }
        }
    }

    out
}

/// Footer shown under every terminal report.
pub fn render_safety_notice(notice: &SafetyNotice) -> String {
    format!("\n{}\n  {}\n", notice.title, notice.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_analysis::{classifier::classify, entities::AnalysisResult};

    #[test]
    fn test_render_full_report() {
        let result = AnalysisResult {
            safe: false,
            food_name: "Crunch Bar".to_string(),
            food_brand: "Unknown Brand".to_string(),
            detected_allergens: vec!["peanuts".to_string()],
            potential_allergens: vec![],
            safe_ingredients: vec!["wheat".to_string()],
            warning_ingredients: vec![],
            unsafe_ingredients: vec!["peanuts".to_string()],
            ingredients: vec!["wheat".to_string(), "peanuts".to_string()],
            analysis: "Contains peanuts.".to_string(),
        };

        let expected = "\
CONTAINS ALLERGENS
This food contains ingredients you are allergic to.
1 allergen detected

Product Information
  Product: Crunch Bar

Detected Allergens
  - peanuts

Ingredient Safety Categories
  safe (1)
    - wheat
  unsafe (1)
    - peanuts

All Ingredients
  [safe] wheat
  [unsafe] peanuts

Detailed Analysis
  Contains peanuts.
";

        assert_eq!(render_report(&classify(&result)), expected);
    }

    #[test]
    fn test_render_omits_product_block_for_sentinels() {
        let result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "safe": true,
            "detected_allergens": [],
            "ingredients": [],
            "analysis": ""
        }))
        .unwrap();

        let report = render_report(&classify(&result));
        assert_eq!(
            report,
            "SAFE TO CONSUME\nThis food appears safe based on your listed allergies.\n0 allergens detected\n"
        );
    }

    #[test]
    fn test_render_safety_notice() {
        let notice = SafetyNotice {
            title: "Important Safety Notice".to_string(),
            description: "Always read labels yourself.".to_string(),
        };

        assert_eq!(
            render_safety_notice(&notice),
            "\nImportant Safety Notice\n  Always read labels yourself.\n"
        );
    }
}
