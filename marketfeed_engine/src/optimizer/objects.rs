use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TITLE_LENGTH: usize = 60;

fn default_max_title_length() -> usize {
    DEFAULT_MAX_TITLE_LENGTH
}

/// Options for the title operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleOptions {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_max_title_length")]
    pub max_length: usize,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self { keywords: Vec::new(), max_length: DEFAULT_MAX_TITLE_LENGTH }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionStyle {
    #[default]
    Marketing,
    Technical,
    Casual,
}

impl DescriptionStyle {
    pub fn directive(&self) -> &'static str {
        match self {
            DescriptionStyle::Marketing => "persuasive marketing copy that sells the benefits",
            DescriptionStyle::Technical => "precise, factual copy focused on specifications",
            DescriptionStyle::Casual => "relaxed, conversational copy",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl DescriptionLength {
    pub fn target_words(&self) -> &'static str {
        match self {
            DescriptionLength::Short => "about 50 words",
            DescriptionLength::Medium => "about 100 words",
            DescriptionLength::Long => "about 200 words",
        }
    }
}

/// Options for the description operation. There is no post-hoc truncation;
/// the length is a prompt hint only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescriptionOptions {
    #[serde(default)]
    pub style: DescriptionStyle,
    #[serde(default)]
    pub length: DescriptionLength,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// One entry of the category suggestion answer. Also the shape the model is
/// asked to emit, so it doubles as the lenient parse target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

/// Result of a title or description operation: pre-image, post-image, the
/// post-image score and the relative improvement.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub product_id: String,
    pub optimization_type: String,
    pub original: String,
    pub optimized: String,
    pub score: u32,
    pub improvement_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRecommendation {
    pub priority: RecommendationPriority,
    pub message: String,
}

/// Output of the rule-based image advisor.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub product_id: String,
    pub image_count: usize,
    pub quality_score: u32,
    pub recommendations: Vec<ImageRecommendation>,
}
