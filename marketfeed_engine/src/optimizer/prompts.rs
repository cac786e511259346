use crate::{
    db_types::Product,
    optimizer::objects::{DescriptionOptions, TitleOptions},
};

pub fn build_title_prompt(product: &Product, options: &TitleOptions) -> String {
    let mut prompt = format!(
        "You are an e-commerce copywriter. Rewrite this product title for search visibility.\n\nCurrent title: \
         {title}\nBrand: {brand}\nCategory: {category}\n",
        title = product.title,
        brand = product.brand,
        category = product.category,
    );
    if !options.keywords.is_empty() {
        prompt.push_str(&format!("Work in these keywords where natural: {}\n", options.keywords.join(", ")));
    }
    prompt.push_str(&format!(
        "Keep it under {} characters. Answer with the new title only, no quotes and no explanation.",
        options.max_length
    ));
    prompt
}

pub fn build_description_prompt(product: &Product, options: &DescriptionOptions) -> String {
    let price = product
        .price
        .map(|p| format!("{} {}", p.to_decimal_string(), product.currency))
        .unwrap_or_else(|| "not listed".to_string());
    let mut prompt = format!(
        "You are an e-commerce copywriter. Write a product description as {style}, {length}.\n\nProduct: \
         {title}\nBrand: {brand}\nCategory: {category}\nPrice: {price}\nCurrent description: \
         {description}\n\nAnswer with the new description only, no headings and no explanation.",
        style = options.style.directive(),
        length = options.length.target_words(),
        title = product.title,
        brand = product.brand,
        category = product.category,
        description = product.description,
    );
    if let Some(instructions) = options.custom_instructions.as_deref().filter(|s| !s.trim().is_empty()) {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(instructions.trim());
    }
    prompt
}

pub fn build_category_prompt(product: &Product) -> String {
    format!(
        "You are an e-commerce merchandiser. Suggest the three best categories for this product.\n\nTitle: \
         {title}\nDescription: {description}\nBrand: {brand}\nCurrent category: {category}\n\nAnswer with a JSON \
         array of exactly 3 objects, each with the keys \"category\", \"confidence\" (0.0 to 1.0) and \"reason\". \
         Return raw JSON only, no prose and no code fences.",
        title = product.title,
        description = product.description,
        brand = product.brand,
        category = product.category,
    )
}
