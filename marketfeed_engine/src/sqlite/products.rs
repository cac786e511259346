use chrono::Utc;
use log::{debug, warn};
use sqlx::{types::Json, SqliteConnection};
use uuid::Uuid;

use super::SqliteDatabaseError;
use crate::{
    db_types::{ListingStatus, NewProduct, Product},
    traits::{ProductField, ProductUpdate},
};

/// Inserts or replaces the product keyed on `(connector_id, external_id)`.
///
/// When the unique constraint on that key is missing (older deployments), the
/// database rejects the `ON CONFLICT` clause; in that case we fall back to
/// check-then-write, which leaves the same state behind.
pub async fn upsert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let result = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            id, connector_id, external_id, title, description, price, compare_at_price, currency,
            sku, gtin, brand, category, images, variants, metadata, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'ACTIVE', $16, $16)
        ON CONFLICT (connector_id, external_id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            price = excluded.price,
            compare_at_price = excluded.compare_at_price,
            currency = excluded.currency,
            sku = excluded.sku,
            gtin = excluded.gtin,
            brand = excluded.brand,
            category = excluded.category,
            images = excluded.images,
            variants = excluded.variants,
            metadata = excluded.metadata,
            status = 'ACTIVE',
            updated_at = excluded.updated_at
        RETURNING *;
        "#,
    )
    .bind(&id)
    .bind(product.connector_id)
    .bind(&product.external_id)
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.compare_at_price)
    .bind(&product.currency)
    .bind(&product.sku)
    .bind(&product.gtin)
    .bind(&product.brand)
    .bind(&product.category)
    .bind(Json(&product.images))
    .bind(Json(&product.variants))
    .bind(Json(&product.metadata))
    .bind(now)
    .fetch_one(&mut *conn)
    .await;
    match result {
        Ok(row) => Ok(row),
        Err(e) if is_missing_constraint(&e) => {
            warn!(
                "🗃️ products is missing the (connector_id, external_id) unique constraint. Falling back to \
                 check-then-write for product {}",
                product.external_id
            );
            checked_upsert(product, conn).await
        },
        Err(e) => Err(e.into()),
    }
}

/// True when the backend rejected an `ON CONFLICT` clause because the unique
/// constraint it names does not exist.
fn is_missing_constraint(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            let msg = db.message();
            msg.contains("ON CONFLICT clause does not match") || msg.contains("no unique or exclusion constraint")
        },
        _ => false,
    }
}

async fn checked_upsert(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    match fetch_product_by_external_id(product.connector_id, &product.external_id, &mut *conn).await? {
        Some(existing) => {
            let update = ProductUpdate {
                title: product.title,
                description: product.description,
                price: product.price,
                compare_at_price: product.compare_at_price,
                currency: product.currency,
                sku: product.sku,
                gtin: product.gtin,
                brand: product.brand,
                category: product.category,
                images: product.images,
                variants: product.variants,
                metadata: product.metadata,
            };
            let updated = update_product(&existing.id, update, &mut *conn).await?;
            set_product_status(&existing.id, ListingStatus::Active, conn).await?;
            updated.ok_or_else(|| SqliteDatabaseError::SqlxError(sqlx::Error::RowNotFound))
        },
        None => insert_product(product, conn).await,
    }
}

async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let row = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            id, connector_id, external_id, title, description, price, compare_at_price, currency,
            sku, gtin, brand, category, images, variants, metadata, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'ACTIVE', $16, $16)
        RETURNING *;
        "#,
    )
    .bind(&id)
    .bind(product.connector_id)
    .bind(&product.external_id)
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.compare_at_price)
    .bind(&product.currency)
    .bind(&product.sku)
    .bind(&product.gtin)
    .bind(&product.brand)
    .bind(&product.category)
    .bind(Json(&product.images))
    .bind(Json(&product.variants))
    .bind(Json(&product.metadata))
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Product {} inserted with id {}", row.external_id, row.id);
    Ok(row)
}

pub async fn fetch_product(id: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_product_by_external_id(
    connector_id: i64,
    external_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as("SELECT * FROM products WHERE connector_id = $1 AND external_id = $2")
        .bind(connector_id)
        .bind(external_id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

pub async fn update_product(
    id: &str,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET
            title = $1,
            description = $2,
            price = $3,
            compare_at_price = $4,
            currency = $5,
            sku = $6,
            gtin = $7,
            brand = $8,
            category = $9,
            images = $10,
            variants = $11,
            metadata = $12,
            updated_at = $13
        WHERE id = $14
        RETURNING *;
        "#,
    )
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.price)
    .bind(update.compare_at_price)
    .bind(&update.currency)
    .bind(&update.sku)
    .bind(&update.gtin)
    .bind(&update.brand)
    .bind(&update.category)
    .bind(Json(&update.images))
    .bind(Json(&update.variants))
    .bind(Json(&update.metadata))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}

pub async fn set_product_field(
    id: &str,
    field: ProductField,
    value: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    // Column names come from a closed enum, never from user input.
    let sql = format!("UPDATE products SET {} = $1, updated_at = $2 WHERE id = $3", field.column());
    let result = sqlx::query(&sql).bind(value).bind(Utc::now()).bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_product_status(
    id: &str,
    status: ListingStatus,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("UPDATE products SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_products_for_connector(
    connector_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, SqliteDatabaseError> {
    let products = sqlx::query_as("SELECT * FROM products WHERE connector_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(connector_id)
        .fetch_all(conn)
        .await?;
    Ok(products)
}

pub async fn fetch_all_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, SqliteDatabaseError> {
    let products =
        sqlx::query_as("SELECT * FROM products ORDER BY created_at ASC, id ASC").fetch_all(conn).await?;
    Ok(products)
}

pub async fn deactivate_products_for_connector(
    connector_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("UPDATE products SET status = 'INACTIVE', updated_at = $1 WHERE connector_id = $2")
        .bind(Utc::now())
        .bind(connector_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
