use crate::{
    db_types::{ListingStatus, Product},
    feeds::xml_escape,
};

/// Google Shopping RSS 2.0 feed. Only ACTIVE products with a positive price
/// are emitted; everything else is skipped silently. Item order follows the
/// input order, so the feed is deterministic for a given product list.
///
/// The `g:` namespace prefix on the item children is contractual.
pub fn google_shopping_feed(products: &[Product], title: &str, link: &str, description: &str) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\" xmlns:g=\"http://base.google.com/ns/1.0\">\n");
    out.push_str("  <channel>\n");
    out.push_str(&format!("    <title>{}</title>\n", xml_escape(title)));
    out.push_str(&format!("    <link>{}</link>\n", xml_escape(link)));
    out.push_str(&format!("    <description>{}</description>\n", xml_escape(description)));
    for product in products {
        let Some(price) = product.price.filter(|p| p.is_positive()) else {
            continue;
        };
        if product.status != ListingStatus::Active {
            continue;
        }
        out.push_str("    <item>\n");
        out.push_str(&format!("      <g:id>{}</g:id>\n", xml_escape(&product.external_id)));
        out.push_str(&format!("      <g:title>{}</g:title>\n", xml_escape(&product.title)));
        out.push_str(&format!("      <g:description>{}</g:description>\n", xml_escape(&product.description)));
        out.push_str(&format!(
            "      <g:price>{} {}</g:price>\n",
            price.to_decimal_string(),
            xml_escape(&product.currency)
        ));
        out.push_str(&format!("      <g:brand>{}</g:brand>\n", xml_escape(&product.brand)));
        out.push_str("      <g:condition>new</g:condition>\n");
        out.push_str("      <g:availability>in stock</g:availability>\n");
        if let Some(image) = product.first_image() {
            out.push_str(&format!("      <g:image_link>{}</g:image_link>\n", xml_escape(image)));
        }
        out.push_str(&format!("      <g:product_type>{}</g:product_type>\n", xml_escape(&product.category)));
        out.push_str("    </item>\n");
    }
    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}
