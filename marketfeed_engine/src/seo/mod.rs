//! SEO enhancement pipeline.
//!
//! Two paths produce [`crate::db_types::Enhancement`] records: an LLM-backed
//! one (OpenRouter chat completions, parsed tolerantly) and a deterministic
//! rule-based one. The LLM path degrades to the rules on any failure, so
//! enhancement as a whole never errors out. Only explicit optimize actions
//! stamp `seo_enhanced = true`, via [`mark_enhanced`].

mod fallback;
mod llm;
mod pipeline;
mod prompt;
mod score;

pub use fallback::{mark_enhanced, rule_based_enhancement, MAX_SEO_DESCRIPTION_CHARS, MAX_SEO_TITLE_CHARS};
pub use llm::{LlmClient, LlmConfig, LlmError, DEFAULT_MODEL, OPENROUTER_URL};
pub use pipeline::SeoEnhancer;
pub use prompt::{
    build_enhancement_prompt,
    Audience,
    EnhancementOptions,
    Language,
    OptimizationLevel,
    OptimizationType,
};
pub use score::seo_score;
