use crate::db_types::Enhancement;

/// Scores an enhancement record on a 0-100 scale.
///
/// Full marks per field require the search-friendly band, not mere presence:
/// titles pay off between 30 and 60 characters, descriptions between 120 and
/// 160, keyword lists between 5 and 10 entries.
pub fn seo_score(enhancement: &Enhancement) -> u32 {
    let mut score = 0;

    let title_len = enhancement.seo_title.chars().count();
    score += match title_len {
        0 => 0,
        30..=60 => 25,
        _ => 15,
    };

    let description_len = enhancement.seo_description.chars().count();
    score += match description_len {
        0 => 0,
        120..=160 => 25,
        50.. => 18,
        _ => 10,
    };

    score += match enhancement.keywords.len() {
        0 => 0,
        5..=10 => 20,
        3.. => 15,
        _ => 8,
    };

    let alt_len = enhancement.alt_text.chars().count();
    score += match alt_len {
        0 => 0,
        20.. => 10,
        _ => 5,
    };

    let schema = enhancement.schema_markup.as_str();
    score += if schema.is_empty() {
        0
    } else if schema.contains("@context") && schema.contains("@type") {
        15
    } else {
        8
    };

    if !enhancement.meta_keywords.is_empty() {
        score += 5;
    }

    score.min(100)
}
