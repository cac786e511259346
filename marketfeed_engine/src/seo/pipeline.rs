use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    db_types::{Enhancement, Product},
    seo::{build_enhancement_prompt, rule_based_enhancement, EnhancementOptions, LlmClient},
};

const ENHANCEMENT_MAX_TOKENS: u32 = 500;
const ENHANCEMENT_TEMPERATURE: f32 = 0.7;

/// What the model is asked to produce. Parsed leniently: unknown keys are
/// ignored, missing keys default, and `schema_markup` may arrive as a nested
/// object instead of a string.
#[derive(Debug, Default, Deserialize)]
struct LlmEnhancement {
    #[serde(default)]
    seo_title: String,
    #[serde(default)]
    seo_description: String,
    #[serde(default)]
    keywords: Vec<Value>,
    #[serde(default)]
    alt_text: String,
    #[serde(default)]
    schema_markup: Value,
}

/// LLM-backed enhancement with a deterministic fallback. Never fails: any
/// provider or parse problem degrades to [`rule_based_enhancement`].
#[derive(Clone, Debug)]
pub struct SeoEnhancer {
    llm: LlmClient,
}

impl SeoEnhancer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Produces an enhancement record for the product. The result always has
    /// `seo_enhanced = false`; explicit optimize actions stamp it afterwards
    /// via [`crate::seo::mark_enhanced`].
    pub async fn enhance_product(&self, product: &Product, options: &EnhancementOptions) -> Enhancement {
        let fallback =
            || rule_based_enhancement(&product.title, &product.description, &product.category, &product.brand);
        if !self.is_configured() {
            debug!("✨️ No LLM configured. Using the rule-based enhancement for product {}", product.id);
            return fallback();
        }
        let prompt = build_enhancement_prompt(product, options);
        let raw = match self.llm.complete(&prompt, ENHANCEMENT_MAX_TOKENS, ENHANCEMENT_TEMPERATURE).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("✨️ LLM enhancement for product {} failed ({e}). Falling back to rules.", product.id);
                return fallback();
            },
        };
        match parse_enhancement(&raw) {
            Some(enhancement) => enhancement,
            None => {
                let excerpt: String = raw.chars().take(200).collect();
                warn!(
                    "✨️ Could not parse the LLM answer for product {}. Falling back to rules. Answer started \
                     with: {excerpt}",
                    product.id
                );
                fallback()
            },
        }
    }
}

/// Parses a model answer into an [`Enhancement`]. Returns None when the
/// answer is not JSON at all, or carries neither a title nor a description.
fn parse_enhancement(raw: &str) -> Option<Enhancement> {
    let body = strip_code_fence(raw);
    let parsed: LlmEnhancement = serde_json::from_str(body).ok()?;
    if parsed.seo_title.trim().is_empty() && parsed.seo_description.trim().is_empty() {
        return None;
    }
    let keywords: Vec<String> = parsed
        .keywords
        .into_iter()
        .filter_map(|k| k.as_str().map(|s| s.trim().to_string()))
        .filter(|k| !k.is_empty())
        .collect();
    let schema_markup = match parsed.schema_markup {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Some(Enhancement {
        seo_title: parsed.seo_title.trim().to_string(),
        seo_description: parsed.seo_description.trim().to_string(),
        meta_keywords: keywords.join(", "),
        keywords,
        alt_text: parsed.alt_text.trim().to_string(),
        schema_markup,
        seo_enhanced: false,
        seo_enhanced_at: String::new(),
    })
}

/// Models often wrap the JSON in a markdown code fence despite instructions.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a_clean_json_answer_parses() {
        let raw = r#"{"seo_title":"Blue Hat | Acme","seo_description":"A fine hat.","keywords":["hat","blue"],
            "alt_text":"A blue hat","schema_markup":"{\"@type\":\"Product\"}"}"#;
        let e = parse_enhancement(raw).unwrap();
        assert_eq!(e.seo_title, "Blue Hat | Acme");
        assert_eq!(e.keywords, vec!["hat", "blue"]);
        assert_eq!(e.meta_keywords, "hat, blue");
        assert!(!e.seo_enhanced);
    }

    #[test]
    fn code_fences_are_stripped() {
        let raw = "```json\n{\"seo_title\":\"Blue Hat\"}\n```";
        let e = parse_enhancement(raw).unwrap();
        assert_eq!(e.seo_title, "Blue Hat");

        let raw = "```\n{\"seo_title\":\"Blue Hat\"}\n```";
        assert!(parse_enhancement(raw).is_some());
    }

    #[test]
    fn a_nested_schema_object_is_coerced_to_a_string() {
        let raw = r#"{"seo_title":"Blue Hat","schema_markup":{"@context":"https://schema.org","@type":"Product"}}"#;
        let e = parse_enhancement(raw).unwrap();
        assert!(e.schema_markup.contains("\"@type\":\"Product\""));
    }

    #[test]
    fn non_string_keywords_are_dropped() {
        let raw = r#"{"seo_title":"Blue Hat","keywords":["hat", 7, null, {"k":"v"}, "  ", "blue"]}"#;
        let e = parse_enhancement(raw).unwrap();
        assert_eq!(e.keywords, vec!["hat", "blue"]);
    }

    #[test]
    fn prose_answers_are_rejected() {
        assert!(parse_enhancement("Sure! Here is your SEO metadata:").is_none());
        assert!(parse_enhancement(r#"{"keywords":["only","keywords"]}"#).is_none());
    }
}
