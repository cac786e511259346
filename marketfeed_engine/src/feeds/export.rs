use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::{
    db_types::Product,
    feeds::{cdata, csv_quote, xml_escape},
};

const EXPORT_VERSION: &str = "1.0";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The Excel variant is byte-identical to the plain one apart from a UTF-8
/// BOM, which makes Excel pick the right encoding on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvVariant {
    Plain,
    Excel,
}

/// Generic CSV export of the full canonical projection. String fields are
/// quoted with embedded quotes doubled; numbers and dates are left bare.
pub fn csv_export(products: &[Product], variant: CsvVariant) -> String {
    let mut out = String::new();
    if variant == CsvVariant::Excel {
        out.push('\u{feff}');
    }
    out.push_str("ID,External ID,Title,Description,Price,Currency,SKU,Brand,Category,Images,Status,Created At,Updated At\n");
    for product in products {
        let row = [
            csv_quote(&product.id),
            csv_quote(&product.external_id),
            csv_quote(&product.title),
            csv_quote(&product.description),
            product.price.map(|p| p.to_decimal_string()).unwrap_or_default(),
            csv_quote(&product.currency),
            csv_quote(product.sku.as_deref().unwrap_or("")),
            csv_quote(&product.brand),
            csv_quote(&product.category),
            csv_quote(&product.images.0.join(";")),
            product.status.to_string(),
            product.created_at.format(TIMESTAMP_FORMAT).to_string(),
            product.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Generic XML export. Free-text fields travel in CDATA sections so catalog
/// HTML does not need entity escaping; prices are formatted to two decimals.
pub fn xml_export(products: &[Product], generated_at: DateTime<Utc>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<products_export>\n");
    out.push_str("  <export_info>\n");
    out.push_str(&format!("    <timestamp>{}</timestamp>\n", generated_at.to_rfc3339()));
    out.push_str(&format!("    <total_products>{}</total_products>\n", products.len()));
    out.push_str("    <format>xml</format>\n");
    out.push_str(&format!("    <version>{EXPORT_VERSION}</version>\n"));
    out.push_str("  </export_info>\n");
    out.push_str("  <products>\n");
    for product in products {
        out.push_str("    <product>\n");
        out.push_str(&format!("      <id>{}</id>\n", xml_escape(&product.id)));
        out.push_str(&format!("      <external_id>{}</external_id>\n", xml_escape(&product.external_id)));
        out.push_str(&format!("      <title>{}</title>\n", cdata(&product.title)));
        out.push_str(&format!("      <description>{}</description>\n", cdata(&product.description)));
        if let Some(price) = product.price {
            out.push_str(&format!("      <price>{}</price>\n", price.to_decimal_string()));
        }
        if let Some(compare_at) = product.compare_at_price {
            out.push_str(&format!("      <compare_at_price>{}</compare_at_price>\n", compare_at.to_decimal_string()));
        }
        out.push_str(&format!("      <currency>{}</currency>\n", xml_escape(&product.currency)));
        if let Some(sku) = product.sku.as_deref() {
            out.push_str(&format!("      <sku>{}</sku>\n", xml_escape(sku)));
        }
        out.push_str(&format!("      <brand>{}</brand>\n", cdata(&product.brand)));
        out.push_str(&format!("      <category>{}</category>\n", cdata(&product.category)));
        out.push_str("      <images>\n");
        for image in &product.images.0 {
            out.push_str(&format!("        <image>{}</image>\n", xml_escape(image)));
        }
        out.push_str("      </images>\n");
        out.push_str(&format!("      <status>{}</status>\n", product.status));
        out.push_str(&format!("      <created_at>{}</created_at>\n", product.created_at.to_rfc3339()));
        out.push_str(&format!("      <updated_at>{}</updated_at>\n", product.updated_at.to_rfc3339()));
        out.push_str("    </product>\n");
    }
    out.push_str("  </products>\n");
    out.push_str("</products_export>\n");
    out
}

/// Generic JSON export: an `export_info` preamble plus the canonical product
/// projection, arrays and `compare_at_price` included.
pub fn json_export(products: &[Product], generated_at: DateTime<Utc>) -> Value {
    let items: Vec<Value> = products
        .iter()
        .map(|product| {
            json!({
                "id": product.id,
                "connector_id": product.connector_id,
                "external_id": product.external_id,
                "title": product.title,
                "description": product.description,
                "price": product.price.map(|p| p.to_decimal_string()),
                "compare_at_price": product.compare_at_price.map(|p| p.to_decimal_string()),
                "currency": product.currency,
                "sku": product.sku,
                "gtin": product.gtin,
                "brand": product.brand,
                "category": product.category,
                "images": product.images.0,
                "variants": product.variants.0,
                "metadata": product.metadata.0,
                "status": product.status,
                "created_at": product.created_at.to_rfc3339(),
                "updated_at": product.updated_at.to_rfc3339(),
            })
        })
        .collect();
    json!({
        "export_info": {
            "timestamp": generated_at.to_rfc3339(),
            "total_products": products.len(),
            "format": "json",
            "version": EXPORT_VERSION,
        },
        "products": items,
    })
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use sqlx::types::Json;

    use super::*;
    use crate::db_types::{Enhancement, ListingStatus};

    fn product() -> Product {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        Product {
            id: "uuid-1".to_string(),
            connector_id: 1,
            external_id: "111".to_string(),
            title: "Blue \"Deluxe\" Hat".to_string(),
            description: "<p>A fine hat</p>".to_string(),
            price: Some(1999.into()),
            compare_at_price: Some(2499.into()),
            currency: "USD".to_string(),
            sku: Some("BH-1".to_string()),
            gtin: None,
            brand: "Acme".to_string(),
            category: "Hats".to_string(),
            images: Json(vec!["https://x/1.jpg".to_string(), "https://x/2.jpg".to_string()]),
            variants: Json(vec![]),
            metadata: Json(Enhancement::default()),
            status: ListingStatus::Active,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn csv_rows_quote_strings_and_double_embedded_quotes() {
        let csv = csv_export(&[product()], CsvVariant::Plain);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with(r#""uuid-1","111","Blue ""Deluxe"" Hat","<p>A fine hat</p>",19.99,"USD""#));
        assert!(row.contains(r#""https://x/1.jpg;https://x/2.jpg""#));
        assert!(row.ends_with("ACTIVE,2024-05-01 12:30:00,2024-05-01 12:30:00"));
    }

    #[test]
    fn the_excel_variant_differs_only_by_the_bom() {
        let products = vec![product()];
        let plain = csv_export(&products, CsvVariant::Plain);
        let excel = csv_export(&products, CsvVariant::Excel);
        assert_eq!(excel.as_bytes()[..3], [0xEF, 0xBB, 0xBF]);
        assert_eq!(&excel.as_bytes()[3..], plain.as_bytes());
    }

    #[test]
    fn xml_export_uses_cdata_for_free_text() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let xml = xml_export(&[product()], at);
        assert!(xml.contains("<timestamp>2024-05-01T12:30:00+00:00</timestamp>"));
        assert!(xml.contains("<total_products>1</total_products>"));
        assert!(xml.contains(r#"<title><![CDATA[Blue "Deluxe" Hat]]></title>"#));
        assert!(xml.contains("<description><![CDATA[<p>A fine hat</p>]]></description>"));
        assert!(xml.contains("<price>19.99</price>"));
        assert!(xml.contains("<compare_at_price>24.99</compare_at_price>"));
    }

    #[test]
    fn json_export_mirrors_the_canonical_projection() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let value = json_export(&[product()], at);
        assert_eq!(value["export_info"]["format"], "json");
        assert_eq!(value["export_info"]["version"], "1.0");
        assert_eq!(value["export_info"]["total_products"], 1);
        let p = &value["products"][0];
        assert_eq!(p["external_id"], "111");
        assert_eq!(p["price"], "19.99");
        assert_eq!(p["compare_at_price"], "24.99");
        assert_eq!(p["status"], "ACTIVE");
        assert_eq!(p["images"].as_array().unwrap().len(), 2);
    }
}
