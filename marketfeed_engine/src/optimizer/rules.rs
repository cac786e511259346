use mfs_common::helpers::truncate_chars;

use crate::{
    db_types::Product,
    optimizer::objects::{
        CategorySuggestion,
        ImageRecommendation,
        ImageReport,
        RecommendationPriority,
        TitleOptions,
    },
};

/// keyword -> category mapping used by the rule-based category suggester.
const CATEGORY_RULES: [(&str, &str); 11] = [
    ("shirt", "Shirts & Tops"),
    ("blouse", "Shirts & Tops"),
    ("top", "Shirts & Tops"),
    ("jacket", "Outerwear"),
    ("coat", "Outerwear"),
    ("jeans", "Bottoms"),
    ("pants", "Bottoms"),
    ("necklace", "Jewelry"),
    ("earrings", "Jewelry"),
    ("bracelet", "Jewelry"),
    ("watch", "Watches"),
];

/// Deterministic title rewrite. Prepends the brand when absent, then appends
/// the category and each keyword as long as the length budget permits.
///
/// Reserved for non-interactive batch flows; the interactive endpoints must
/// report provider failures rather than silently substituting this.
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) fn rule_based_title(title: &str, brand: &str, category: &str, options: &TitleOptions) -> String {
    let title = title.trim();
    let mut result = if brand.is_empty() || title.to_lowercase().contains(&brand.to_lowercase()) {
        title.to_string()
    } else {
        format!("{brand} {title}")
    };
    let category = category.trim();
    if !category.is_empty() && !result.to_lowercase().contains(&category.to_lowercase()) {
        let candidate = format!("{result} - {category}");
        if candidate.chars().count() <= options.max_length {
            result = candidate;
        }
    }
    for keyword in &options.keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || result.to_lowercase().contains(&keyword.to_lowercase()) {
            continue;
        }
        let candidate = format!("{result} {keyword}");
        if candidate.chars().count() <= options.max_length {
            result = candidate;
        }
    }
    truncate_chars(&result, options.max_length, "…")
}

/// Scans the title and description for fixed keyword mappings. Falls back to
/// `Fashion` at 0.7 confidence when nothing matches. `dress` is checked after
/// the table so that e.g. "dress shirt" resolves to shirts first.
///
/// Reserved for non-interactive batch flows, like [`rule_based_title`].
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) fn rule_based_category(title: &str, description: &str) -> CategorySuggestion {
    let haystack = format!("{} {}", title, description).to_lowercase();
    for (keyword, category) in CATEGORY_RULES {
        if haystack.contains(keyword) {
            return CategorySuggestion {
                category: category.to_string(),
                confidence: 0.9,
                reason: format!("matched keyword '{keyword}'"),
            };
        }
    }
    if haystack.contains("dress") {
        return CategorySuggestion {
            category: "Dresses".to_string(),
            confidence: 0.9,
            reason: "matched keyword 'dress'".to_string(),
        };
    }
    CategorySuggestion {
        category: "Fashion".to_string(),
        confidence: 0.7,
        reason: "no category keyword matched".to_string(),
    }
}

const PLACEHOLDER_MARKERS: [&str; 4] = ["placeholder", "placehold.", "no-image", "noimage"];
const RESOLUTION_MARKERS: [&str; 5] = ["1024x", "2048x", "_large", "_master", "_grande"];
const MULTI_ANGLE_CATEGORIES: [&str; 4] = ["Shirts & Tops", "Outerwear", "Dresses", "Bottoms"];

/// Rule-based image advisor. No LLM involved; everything is derived from the
/// image URL list and the category.
pub fn image_report(product: &Product) -> ImageReport {
    let images = &product.images.0;
    let count = images.len();
    let mut recommendations = Vec::new();
    match count {
        0 => recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::High,
            message: "Product has no images. Add at least one high-resolution photo.".to_string(),
        }),
        1..=2 => recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::Medium,
            message: format!("Only {count} image(s). Shoppers expect 3 or more angles."),
        }),
        3..=8 => {},
        _ => recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::Low,
            message: format!("{count} images is a lot. Trim to the 8 strongest shots."),
        }),
    }
    let placeholders = images.iter().filter(|url| is_placeholder(url)).count();
    if placeholders > 0 {
        recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::High,
            message: format!("{placeholders} image(s) look like placeholders. Replace them with real photos."),
        });
    }
    if count > 0 && !images.iter().any(|url| has_resolution_hint(url)) {
        recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::Low,
            message: "No image URL indicates a high-resolution rendition. Prefer 1024px or larger.".to_string(),
        });
    }
    if MULTI_ANGLE_CATEGORIES.contains(&product.category.as_str()) && count < 4 {
        recommendations.push(ImageRecommendation {
            priority: RecommendationPriority::Medium,
            message: format!("{} sells better with front, back and detail shots.", product.category),
        });
    }
    let base = match count {
        0 => 0,
        1..=2 => 20,
        3..=8 => 40,
        _ => 30,
    };
    let bonus: u32 = images
        .iter()
        .map(|url| {
            let mut b = 0;
            if has_resolution_hint(url) {
                b += 5;
            }
            if is_placeholder(url) {
                b = 0;
            }
            b
        })
        .sum();
    let quality_score = (base + bonus).min(100);
    ImageReport { product_id: product.id.clone(), image_count: count, quality_score, recommendations }
}

fn is_placeholder(url: &str) -> bool {
    let url = url.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| url.contains(m))
}

fn has_resolution_hint(url: &str) -> bool {
    let url = url.to_lowercase();
    RESOLUTION_MARKERS.iter().any(|m| url.contains(m))
}
