use crate::db_types::{InventoryLevel, UpsertInventoryLevel};

#[allow(async_fn_in_trait)]
pub trait InventoryManagement: Clone {
    type Error: std::error::Error;

    /// Inserts or replaces the level keyed on
    /// `(connector_id, inventory_item_id, location_id)`.
    async fn upsert_inventory_level(&self, level: UpsertInventoryLevel) -> Result<InventoryLevel, Self::Error>;

    async fn fetch_inventory_levels_for_product(&self, product_id: &str)
        -> Result<Vec<InventoryLevel>, Self::Error>;
}
