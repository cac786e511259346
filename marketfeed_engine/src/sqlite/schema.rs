use sqlx::SqlitePool;

use super::SqliteDatabaseError;

/// Idempotent schema creation, run lazily when the pool is first created.
///
/// `products` carries the `(connector_id, external_id)` unique key the upsert
/// path relies on; the code still tolerates its absence (see
/// [`super::products::upsert_product`]). `inventory_levels.product_id` is TEXT
/// so the `unknown` sentinel can live alongside UUIDs.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS connectors (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            kind         TEXT NOT NULL DEFAULT 'shopify',
            status       TEXT NOT NULL DEFAULT 'ACTIVE',
            shop_domain  TEXT NOT NULL UNIQUE,
            access_token TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            last_sync_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id               TEXT PRIMARY KEY,
            connector_id     INTEGER NOT NULL,
            external_id      TEXT NOT NULL,
            title            TEXT NOT NULL,
            description      TEXT NOT NULL DEFAULT '',
            price            INTEGER,
            compare_at_price INTEGER,
            currency         TEXT NOT NULL DEFAULT 'USD',
            sku              TEXT,
            gtin             TEXT,
            brand            TEXT NOT NULL DEFAULT '',
            category         TEXT NOT NULL DEFAULT '',
            images           TEXT NOT NULL DEFAULT '[]',
            variants         TEXT NOT NULL DEFAULT '[]',
            metadata         TEXT NOT NULL DEFAULT '{}',
            status           TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL,
            UNIQUE (connector_id, external_id)
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_levels (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id        TEXT NOT NULL,
            connector_id      INTEGER NOT NULL,
            inventory_item_id INTEGER NOT NULL,
            location_id       INTEGER NOT NULL,
            available         INTEGER NOT NULL DEFAULT 0,
            committed         INTEGER NOT NULL DEFAULT 0,
            on_hand           INTEGER NOT NULL DEFAULT 0,
            incoming          INTEGER NOT NULL DEFAULT 0,
            updated_at        TEXT NOT NULL,
            UNIQUE (connector_id, inventory_item_id, location_id)
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_connector ON products (connector_id);")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_inventory_product ON inventory_levels (product_id);")
        .execute(pool)
        .await?;
    Ok(())
}
