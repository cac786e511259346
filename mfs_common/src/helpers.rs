/// Normalizes a Shopify shop identifier to its bare store name by stripping a
/// trailing `.myshopify.com` (and any scheme or trailing slash a user may have
/// pasted in).
pub fn normalize_shop_domain(shop: &str) -> String {
    let shop = shop.trim().trim_end_matches('/');
    let shop = shop.strip_prefix("https://").or_else(|| shop.strip_prefix("http://")).unwrap_or(shop);
    shop.strip_suffix(".myshopify.com").unwrap_or(shop).to_string()
}

/// Truncates a string to at most `max` characters, counting `char`s rather
/// than bytes so multi-byte titles do not get split mid-character.
pub fn truncate_chars(s: &str, max: usize, ellipsis: &str) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut = max.saturating_sub(ellipsis.chars().count());
    let mut out: String = s.chars().take(cut).collect();
    out.push_str(ellipsis);
    out
}
