//! Interactive per-product optimization.
//!
//! Four named operations (title, description, category, images) plus an
//! apply step that writes one optimized value back to the store. The first
//! three are LLM-backed and surface provider failures to the caller; the
//! image advisor is entirely rule-based.

mod api;
mod objects;
mod prompts;
mod rules;

pub use api::OptimizerApi;
pub use objects::{
    CategorySuggestion,
    DescriptionLength,
    DescriptionOptions,
    DescriptionStyle,
    ImageRecommendation,
    ImageReport,
    OptimizationOutcome,
    RecommendationPriority,
    TitleOptions,
    DEFAULT_MAX_TITLE_LENGTH,
};
pub use rules::image_report;
