use serde::{Deserialize, Serialize};

use crate::db_types::Product;

/// What the caller wants enhanced. `All` is the default and what automatic
/// flows use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    Title,
    Description,
    Category,
    Tags,
    Seo,
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

impl Language {
    fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    General,
    Professionals,
    Students,
    Families,
}

impl Audience {
    fn description(&self) -> &'static str {
        match self {
            Audience::General => "a general consumer audience",
            Audience::Professionals => "professionals looking for reliable, high-quality gear",
            Audience::Students => "students shopping on a budget",
            Audience::Families => "families shopping for the household",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl OptimizationLevel {
    fn directive(&self) -> &'static str {
        match self {
            OptimizationLevel::Conservative => {
                "Stay close to the original wording. Fix clarity and keyword placement only."
            },
            OptimizationLevel::Balanced => {
                "Improve wording and keyword coverage while keeping the original meaning intact."
            },
            OptimizationLevel::Aggressive => {
                "Rewrite freely for maximum search visibility and conversion, as long as the facts stay accurate."
            },
        }
    }
}

/// Knobs for an explicit enhancement request. All fields default, so an empty
/// request body is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhancementOptions {
    #[serde(default)]
    pub optimization_type: OptimizationType,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub level: OptimizationLevel,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// Builds the enhancement prompt. The model is instructed to answer with a
/// strict JSON object; the pipeline still parses tolerantly because models do
/// not always obey.
pub fn build_enhancement_prompt(product: &Product, options: &EnhancementOptions) -> String {
    let price = product
        .price
        .map(|p| format!("{} {}", p.to_decimal_string(), product.currency))
        .unwrap_or_else(|| "not listed".to_string());
    let sku = product.sku.as_deref().filter(|s| !s.is_empty()).unwrap_or("not listed");
    let focus = match options.optimization_type {
        OptimizationType::Title => "Focus on the title.",
        OptimizationType::Description => "Focus on the description.",
        OptimizationType::Category => "Focus on categorization keywords.",
        OptimizationType::Tags => "Focus on keywords and tags.",
        OptimizationType::Seo | OptimizationType::All => "Optimize every field.",
    };
    let mut prompt = format!(
        "You are an e-commerce SEO specialist. Write SEO metadata in {language} for the product below, \
         targeting {audience}.\n{level}\n{focus}\n\nProduct:\n- Title: {title}\n- Description: {description}\n- \
         Category: {category}\n- Brand: {brand}\n- Price: {price}\n- SKU: {sku}\n\nAnswer with a single JSON object and nothing \
         else, using exactly these keys:\n{{\n  \"seo_title\": \"max 60 characters\",\n  \"seo_description\": \"max \
         160 characters\",\n  \"keywords\": [\"5 to 10 keyword strings\"],\n  \"alt_text\": \"image alt text\",\n  \
         \"schema_markup\": \"a JSON-LD Product object serialized as a string\"\n}}",
        language = options.language.name(),
        audience = options.audience.description(),
        level = options.level.directive(),
        title = product.title,
        description = product.description,
        category = product.category,
        brand = product.brand,
    );
    if let Some(instructions) = options.custom_instructions.as_deref().filter(|s| !s.trim().is_empty()) {
        prompt.push_str("\n\nAdditional instructions: ");
        prompt.push_str(instructions.trim());
    }
    prompt
}
