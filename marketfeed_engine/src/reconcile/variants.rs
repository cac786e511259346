use shopify_tools::ShopifyVariant;

/// Reconciles a webhook payload's variant list with the stored variants.
///
/// Shopify update webhooks sometimes omit inventory fields entirely. Zeroing
/// out a stored count because the payload was silent would be destructive, so
/// for each incoming variant matched by id to a stored one:
///
/// * `inventory_management` and `inventory_policy` are preserved from the
///   stored variant when the incoming value is empty;
/// * the stored `inventory_quantity` is kept when the incoming payload has no
///   quantity at all, or when inventory is untracked after the merge and the
///   stored count is positive;
/// * an explicit incoming quantity under tracked inventory always wins — a
///   tracked update of 0 is a real "sold out" signal.
///
/// Incoming variants with no stored counterpart pass through unchanged, and
/// stored variants absent from the payload are dropped: the incoming list is
/// the new source of truth for which variants exist.
pub fn merge_variants(existing: &[ShopifyVariant], incoming: Vec<ShopifyVariant>) -> Vec<ShopifyVariant> {
    incoming
        .into_iter()
        .map(|mut variant| {
            let Some(stored) = existing.iter().find(|e| e.id == variant.id) else {
                return variant;
            };
            if variant.inventory_management.as_deref().unwrap_or("").is_empty() {
                variant.inventory_management = stored.inventory_management.clone();
            }
            if variant.inventory_policy.as_deref().unwrap_or("").is_empty() {
                variant.inventory_policy = stored.inventory_policy.clone();
            }
            if variant.inventory_item_id.is_none() {
                variant.inventory_item_id = stored.inventory_item_id;
            }
            let untracked = !variant.tracks_inventory();
            let stored_quantity = stored.inventory_quantity.unwrap_or(0);
            if variant.inventory_quantity.is_none() || (untracked && stored_quantity > 0) {
                variant.inventory_quantity = stored.inventory_quantity;
            }
            variant
        })
        .collect()
}
