use log::{debug, info};
use mfs_common::helpers::truncate_chars;

use crate::{
    db_types::Product,
    optimizer::{
        objects::{CategorySuggestion, DescriptionOptions, ImageReport, OptimizationOutcome, TitleOptions},
        prompts::{build_category_prompt, build_description_prompt, build_title_prompt},
    },
    seo::{LlmClient, LlmError},
    traits::{ProductField, ProductManagement},
    ListingApiError,
};

const TITLE_MAX_TOKENS: u32 = 100;
const DESCRIPTION_MAX_TOKENS: u32 = 400;
const CATEGORY_MAX_TOKENS: u32 = 300;
const OPTIMIZER_TEMPERATURE: f32 = 0.7;

/// Interactive per-product optimization. Unlike the batch enhancement
/// pipeline, an LLM failure here is surfaced to the caller rather than
/// silently replaced by rules: the user asked for an optimization and must be
/// told when it could not be produced.
#[derive(Clone, Debug)]
pub struct OptimizerApi<B> {
    db: B,
    llm: LlmClient,
}

impl<B> OptimizerApi<B>
where B: ProductManagement
{
    pub fn new(db: B, llm: LlmClient) -> Self {
        Self { db, llm }
    }

    /// Rewrites the title via the LLM. The answer is trimmed and, when it
    /// overshoots the requested maximum, hard-truncated with an ellipsis.
    pub async fn optimize_title(
        &self,
        product_id: &str,
        options: &TitleOptions,
    ) -> Result<OptimizationOutcome, ListingApiError> {
        let product = self.load(product_id).await?;
        let prompt = build_title_prompt(&product, options);
        let raw = self.llm.complete(&prompt, TITLE_MAX_TOKENS, OPTIMIZER_TEMPERATURE).await?;
        let optimized = truncate_chars(clean_single_line(&raw).as_str(), options.max_length, "…");
        let before = title_score(&product.title, options.max_length);
        let score = title_score(&optimized, options.max_length);
        debug!("🎯️ Title optimization for {product_id}: score {before} -> {score}");
        Ok(OptimizationOutcome {
            product_id: product.id,
            optimization_type: "title".to_string(),
            original: product.title,
            optimized,
            score,
            improvement_percent: improvement_percent(before, score),
        })
    }

    /// Rewrites the description via the LLM. The length option is a prompt
    /// hint only; the answer is never truncated.
    pub async fn enhance_description(
        &self,
        product_id: &str,
        options: &DescriptionOptions,
    ) -> Result<OptimizationOutcome, ListingApiError> {
        let product = self.load(product_id).await?;
        let prompt = build_description_prompt(&product, options);
        let raw = self.llm.complete(&prompt, DESCRIPTION_MAX_TOKENS, OPTIMIZER_TEMPERATURE).await?;
        let optimized = raw.trim().to_string();
        let before = description_score(&product.description);
        let score = description_score(&optimized);
        debug!("🎯️ Description optimization for {product_id}: score {before} -> {score}");
        Ok(OptimizationOutcome {
            product_id: product.id,
            optimization_type: "description".to_string(),
            original: product.description,
            optimized,
            score,
            improvement_percent: improvement_percent(before, score),
        })
    }

    /// Asks the LLM for exactly three category suggestions. A malformed
    /// answer is an upstream failure, not a silent fallback.
    pub async fn suggest_category(&self, product_id: &str) -> Result<Vec<CategorySuggestion>, ListingApiError> {
        let product = self.load(product_id).await?;
        let prompt = build_category_prompt(&product);
        let raw = self.llm.complete(&prompt, CATEGORY_MAX_TOKENS, OPTIMIZER_TEMPERATURE).await?;
        let suggestions = parse_category_suggestions(&raw)
            .ok_or_else(|| LlmError::UnparseableAnswer(raw.chars().take(200).collect()))?;
        Ok(suggestions)
    }

    /// Rule-based image advisor. No LLM is involved.
    pub async fn optimize_images(&self, product_id: &str) -> Result<ImageReport, ListingApiError> {
        let product = self.load(product_id).await?;
        Ok(super::rules::image_report(&product))
    }

    /// Writes one optimized value back. Only the three text columns are
    /// applicable; anything else is rejected.
    pub async fn apply_optimization(
        &self,
        product_id: &str,
        optimization_type: &str,
        optimized_value: &str,
    ) -> Result<(), ListingApiError> {
        let field = ProductField::from_optimization_type(optimization_type).ok_or_else(|| {
            ListingApiError::InvalidArgument(format!(
                "'{optimization_type}' cannot be applied. Use title, description or category."
            ))
        })?;
        let updated = self
            .db
            .set_product_field(product_id, field, optimized_value)
            .await
            .map_err(ListingApiError::database)?;
        if !updated {
            return Err(ListingApiError::NotFound(format!("Product {product_id}")));
        }
        info!("🎯️ Applied {optimization_type} optimization to product {product_id}");
        Ok(())
    }

    async fn load(&self, product_id: &str) -> Result<Product, ListingApiError> {
        self.db
            .fetch_product(product_id)
            .await
            .map_err(ListingApiError::database)?
            .ok_or_else(|| ListingApiError::NotFound(format!("Product {product_id}")))
    }
}

/// Models sometimes wrap a one-line answer in quotes or a code fence.
fn clean_single_line(raw: &str) -> String {
    let raw = raw.trim().trim_matches('`');
    let line = raw.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    line.trim().trim_matches('"').trim().to_string()
}

/// Extracts the first JSON array from the answer and parses it leniently.
/// Entries without a category are dropped; at most three are kept.
fn parse_category_suggestions(raw: &str) -> Option<Vec<CategorySuggestion>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    let parsed: Vec<CategorySuggestion> = serde_json::from_str(&raw[start..=end]).ok()?;
    let suggestions: Vec<CategorySuggestion> =
        parsed.into_iter().filter(|s| !s.category.trim().is_empty()).take(3).collect();
    if suggestions.is_empty() {
        return None;
    }
    Some(suggestions)
}

fn title_score(title: &str, max_length: usize) -> u32 {
    let len = title.chars().count();
    if len == 0 {
        return 0;
    }
    let mut score = 50;
    if len <= max_length {
        score += 30;
    }
    if (20..=max_length).contains(&len) {
        score += 20;
    }
    score
}

fn description_score(description: &str) -> u32 {
    match description.split_whitespace().count() {
        0 => 0,
        1..=19 => 60,
        20..=150 => 90,
        _ => 75,
    }
}

fn improvement_percent(before: u32, after: u32) -> f64 {
    if before == 0 {
        return f64::from(after);
    }
    (f64::from(after) - f64::from(before)) / f64::from(before) * 100.0
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn category_answers_parse_through_fences_and_prose() {
        let raw = "Here you go:\n```json\n[{\"category\":\"Hats\",\"confidence\":0.9,\"reason\":\"it is a \
                   hat\"},{\"category\":\"Accessories\",\"confidence\":0.6,\"reason\":\"generic\"}]\n```";
        let suggestions = parse_category_suggestions(raw).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, "Hats");
    }

    #[test]
    fn category_answers_are_capped_at_three() {
        let raw = r#"[{"category":"A"},{"category":"B"},{"category":"C"},{"category":"D"}]"#;
        assert_eq!(parse_category_suggestions(raw).unwrap().len(), 3);
    }

    #[test]
    fn prose_category_answers_are_rejected() {
        assert!(parse_category_suggestions("I think Hats fits best.").is_none());
        assert!(parse_category_suggestions("[]").is_none());
    }

    #[test]
    fn llm_titles_are_cleaned_and_scored() {
        assert_eq!(clean_single_line("```\n\"Acme Blue Hat\"\n```"), "Acme Blue Hat");
        assert_eq!(title_score("", 60), 0);
        assert_eq!(title_score("Blue Hat", 60), 80);
        assert_eq!(title_score("A title comfortably inside the limit", 60), 100);
        assert_eq!(title_score(&"x".repeat(80), 60), 50);
    }

    #[test]
    fn improvement_handles_a_zero_baseline() {
        assert!((improvement_percent(0, 80) - 80.0).abs() < f64::EPSILON);
        assert!((improvement_percent(80, 100) - 25.0).abs() < f64::EPSILON);
    }
}
