use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall verdict shown at the top of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyBanner {
    ContainsAllergens,
    PotentialAllergens,
    Safe,
}

impl SafetyBanner {
    pub fn headline(&self) -> &'static str {
        match self {
            SafetyBanner::ContainsAllergens => "CONTAINS ALLERGENS",
            SafetyBanner::PotentialAllergens => "POTENTIAL ALLERGENS",
            SafetyBanner::Safe => "SAFE TO CONSUME",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SafetyBanner::ContainsAllergens => {
                "This food contains ingredients you are allergic to."
            }
            SafetyBanner::PotentialAllergens => {
                "This food contains ingredients that might be related to your allergies."
            }
            SafetyBanner::Safe => "This food appears safe based on your listed allergies.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SafetyTier {
    Safe,
    Warning,
    Unsafe,
    Unclassified,
}

impl SafetyTier {
    pub fn as_str(&self) -> &str {
        match self {
            SafetyTier::Safe => "safe",
            SafetyTier::Warning => "warning",
            SafetyTier::Unsafe => "unsafe",
            SafetyTier::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductInfo {
    pub name: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientView {
    pub name: String,
    pub tier: SafetyTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TierGroup {
    pub tier: SafetyTier,
    pub ingredients: Vec<String>,
}

/// A block of the result view. Only non-empty sections are ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ResultSection {
    DetectedAllergens(Vec<String>),
    PotentialAllergens(Vec<String>),
    IngredientCategories(Vec<TierGroup>),
    AllIngredients(Vec<IngredientView>),
    Analysis(String),
}

impl ResultSection {
    pub fn title(&self) -> &'static str {
        match self {
            ResultSection::DetectedAllergens(_) => "Detected Allergens",
            ResultSection::PotentialAllergens(_) => "Potential Allergens",
            ResultSection::IngredientCategories(_) => "Ingredient Safety Categories",
            ResultSection::AllIngredients(_) => "All Ingredients",
            ResultSection::Analysis(_) => "Detailed Analysis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderableResult {
    pub banner: SafetyBanner,
    pub allergen_count: usize,
    pub allergen_count_label: String,
    pub product: Option<ProductInfo>,
    pub sections: Vec<ResultSection>,
}

impl RenderableResult {
    pub fn section(&self, title: &str) -> Option<&ResultSection> {
        self.sections.iter().find(|s| s.title() == title)
    }
}
