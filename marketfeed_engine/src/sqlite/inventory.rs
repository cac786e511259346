use chrono::Utc;
use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::db_types::{InventoryLevel, UpsertInventoryLevel};

pub async fn upsert_inventory_level(
    level: UpsertInventoryLevel,
    conn: &mut SqliteConnection,
) -> Result<InventoryLevel, SqliteDatabaseError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO inventory_levels (
            product_id, connector_id, inventory_item_id, location_id,
            available, committed, on_hand, incoming, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (connector_id, inventory_item_id, location_id) DO UPDATE SET
            product_id = excluded.product_id,
            available = excluded.available,
            committed = excluded.committed,
            on_hand = excluded.on_hand,
            incoming = excluded.incoming,
            updated_at = excluded.updated_at
        RETURNING *;
        "#,
    )
    .bind(&level.product_id)
    .bind(level.connector_id)
    .bind(level.inventory_item_id)
    .bind(level.location_id)
    .bind(level.available)
    .bind(level.committed)
    .bind(level.on_hand)
    .bind(level.incoming)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn fetch_inventory_levels_for_product(
    product_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<InventoryLevel>, SqliteDatabaseError> {
    let levels = sqlx::query_as("SELECT * FROM inventory_levels WHERE product_id = $1 ORDER BY id ASC")
        .bind(product_id)
        .fetch_all(conn)
        .await?;
    Ok(levels)
}
