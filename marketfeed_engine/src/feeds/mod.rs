//! Feed projection layer.
//!
//! Every feed is a pure function of the product list (plus an explicit
//! generation timestamp for the export formats), so identical inputs always
//! produce byte-identical output.

mod export;
mod facebook;
mod google;

pub use export::{csv_export, json_export, xml_export, CsvVariant};
pub use facebook::facebook_feed;
pub use google::google_shopping_feed;

pub(crate) fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Wraps a value in a CDATA section, splitting on any embedded terminator.
pub(crate) fn cdata(value: &str) -> String {
    format!("<![CDATA[{}]]>", value.replace("]]>", "]]]]><![CDATA[>"))
}

/// Double-quote-wraps a CSV field, doubling embedded quotes.
pub(crate) fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
