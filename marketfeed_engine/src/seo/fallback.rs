use chrono::Utc;
use mfs_common::helpers::truncate_chars;
use serde_json::json;

use crate::db_types::Enhancement;

pub const MAX_SEO_TITLE_CHARS: usize = 60;
pub const MAX_SEO_DESCRIPTION_CHARS: usize = 160;

/// Deterministic SEO enhancement derived from the catalog fields alone. This
/// is what every automatic sync attaches, and what the LLM pipeline falls back
/// to when the provider is unreachable or answers garbage.
///
/// The result always carries `seo_enhanced = false`.
pub fn rule_based_enhancement(title: &str, description: &str, category: &str, vendor: &str) -> Enhancement {
    let seo_title = truncate_chars(title.trim(), MAX_SEO_TITLE_CHARS, "...");
    let seo_description = if description.trim().is_empty() {
        synthesized_description(title, category, vendor)
    } else {
        truncate_chars(description, MAX_SEO_DESCRIPTION_CHARS, "...")
    };
    let keywords = rule_based_keywords(title, category, vendor);
    let meta_keywords = keywords.join(", ");
    let alt_text = format!("{title} - {category} product from {vendor}");
    let schema_markup = json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": title,
        "description": seo_description,
        "brand": { "@type": "Brand", "name": vendor },
        "category": category,
    })
    .to_string();
    Enhancement {
        seo_title,
        seo_description,
        keywords,
        meta_keywords,
        alt_text,
        schema_markup,
        seo_enhanced: false,
        seo_enhanced_at: String::new(),
    }
}

/// Flips an enhancement to the explicitly-enhanced state and stamps it.
pub fn mark_enhanced(mut enhancement: Enhancement) -> Enhancement {
    enhancement.seo_enhanced = true;
    enhancement.seo_enhanced_at = Utc::now().to_rfc3339();
    enhancement
}

fn rule_based_keywords(title: &str, category: &str, vendor: &str) -> Vec<String> {
    let category = category.trim();
    let mut keywords = vec![
        title.trim().to_lowercase(),
        category.to_lowercase(),
        vendor.trim().to_lowercase(),
        "online shopping".to_string(),
        "buy online".to_string(),
    ];
    if !category.is_empty() {
        keywords.push(format!("{} for sale", category.to_lowercase()));
    }
    keywords.retain(|k| !k.is_empty());
    keywords.dedup();
    keywords
}

fn synthesized_description(title: &str, category: &str, vendor: &str) -> String {
    truncate_chars(
        &format!(
            "Shop {title} online. High-quality {category} from {vendor}. Fast shipping and great customer service."
        ),
        MAX_SEO_DESCRIPTION_CHARS,
        "...",
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_catalog_fields_produce_the_expected_record() {
        let e = rule_based_enhancement(
            "Classic Blue Denim Jacket",
            "<p>A <b>timeless</b> denim jacket.</p>",
            "Outerwear",
            "Acme",
        );
        assert_eq!(e.seo_title, "Classic Blue Denim Jacket");
        // The description is carried as stored, markup included.
        assert_eq!(e.seo_description, "<p>A <b>timeless</b> denim jacket.</p>");
        assert_eq!(e.keywords, vec![
            "classic blue denim jacket",
            "outerwear",
            "acme",
            "online shopping",
            "buy online",
            "outerwear for sale",
        ]);
        assert_eq!(e.meta_keywords, e.keywords.join(", "));
        assert_eq!(e.alt_text, "Classic Blue Denim Jacket - Outerwear product from Acme");
        assert!(e.schema_markup.contains(r#""@type":"Product""#));
        assert!(!e.seo_enhanced);
        assert!(e.seo_enhanced_at.is_empty());
    }

    #[test]
    fn long_title_is_truncated_with_an_ellipsis() {
        let long = "An Extremely Long And Overly Detailed Product Title That Never Seems To End At All";
        let e = rule_based_enhancement(long, "", "", "");
        assert_eq!(e.seo_title.chars().count(), MAX_SEO_TITLE_CHARS);
        assert!(e.seo_title.ends_with("..."));
    }

    #[test]
    fn empty_description_is_synthesized() {
        let e = rule_based_enhancement("Red Scarf", "", "Scarves", "Acme");
        assert_eq!(
            e.seo_description,
            "Shop Red Scarf online. High-quality Scarves from Acme. Fast shipping and great customer service."
        );
        assert_eq!(e.keywords, vec![
            "red scarf",
            "scarves",
            "acme",
            "online shopping",
            "buy online",
            "scarves for sale",
        ]);
    }

    #[test]
    fn the_synthesis_template_is_used_verbatim() {
        let e = rule_based_enhancement("Blue Hat", "", "", "");
        assert_eq!(
            e.seo_description,
            "Shop Blue Hat online. High-quality  from . Fast shipping and great customer service."
        );
    }

    #[test]
    fn a_long_description_is_truncated_without_rewriting() {
        let long = "word ".repeat(60);
        let e = rule_based_enhancement("Blue Hat", &long, "Hats", "Acme");
        assert_eq!(e.seo_description.chars().count(), MAX_SEO_DESCRIPTION_CHARS);
        assert!(e.seo_description.ends_with("..."));
        assert!(e.seo_description.starts_with("word word"));
    }

    #[test]
    fn empty_fields_are_skipped_in_keywords() {
        let e = rule_based_enhancement("Blue Hat", "", "", "");
        assert_eq!(e.keywords, vec!["blue hat", "online shopping", "buy online"]);
    }

    #[test]
    fn marking_enhanced_sets_the_flag_and_timestamp() {
        let e = mark_enhanced(rule_based_enhancement("Blue Hat", "", "Hats", "Acme"));
        assert!(e.seo_enhanced);
        assert!(!e.seo_enhanced_at.is_empty());
    }
}
