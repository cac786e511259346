use crate::db_types::Product;

const HEADER: &str = "id,name,description,price,sku,brand,category,image_url,availability,condition,url";

/// Facebook / Instagram catalog CSV. Values are emitted raw, matching what
/// the channel ingests for simple catalogs; commas inside catalog text are
/// flattened to spaces rather than quoted.
pub fn facebook_feed(products: &[Product], product_url_base: &str) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for product in products {
        let price = product.price.map(|p| format!("{} {}", p.to_decimal_string(), product.currency));
        let availability = if product.is_in_stock() { "in stock" } else { "out of stock" };
        let url = if product_url_base.is_empty() {
            String::new()
        } else {
            format!("{}/{}", product_url_base.trim_end_matches('/'), product.id)
        };
        let row = [
            product.external_id.as_str(),
            &flatten(&product.title),
            &flatten(&product.description),
            price.as_deref().unwrap_or(""),
            product.sku.as_deref().unwrap_or(""),
            &flatten(&product.brand),
            &flatten(&product.category),
            product.first_image().unwrap_or(""),
            availability,
            "new",
            url.as_str(),
        ]
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn flatten(value: &str) -> String {
    value.replace([',', '\n', '\r'], " ")
}
