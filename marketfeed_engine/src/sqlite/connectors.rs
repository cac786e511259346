use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::db_types::{Connector, ListingStatus, NewConnector};

/// Inserts the connector, or refreshes token/name/status for an existing shop
/// domain. Re-installing a previously uninstalled shop reactivates the row.
pub async fn upsert_connector(
    connector: NewConnector,
    conn: &mut SqliteConnection,
) -> Result<Connector, SqliteDatabaseError> {
    let now = Utc::now();
    let result = sqlx::query_as(
        r#"
        INSERT INTO connectors (name, kind, status, shop_domain, access_token, created_at)
        VALUES ($1, $2, 'ACTIVE', $3, $4, $5)
        ON CONFLICT (shop_domain) DO UPDATE SET
            name = excluded.name,
            access_token = excluded.access_token,
            status = 'ACTIVE'
        RETURNING *;
        "#,
    )
    .bind(connector.name)
    .bind(connector.kind)
    .bind(connector.shop_domain)
    .bind(connector.access_token)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(result)
}

pub async fn fetch_connector(id: i64, conn: &mut SqliteConnection) -> Result<Option<Connector>, SqliteDatabaseError> {
    let connector = sqlx::query_as("SELECT * FROM connectors WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(connector)
}

pub async fn fetch_connector_by_shop(
    shop_domain: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Connector>, SqliteDatabaseError> {
    let connector = sqlx::query_as("SELECT * FROM connectors WHERE shop_domain = $1")
        .bind(shop_domain)
        .fetch_optional(conn)
        .await?;
    Ok(connector)
}

pub async fn set_connector_status(
    id: i64,
    status: ListingStatus,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE connectors SET status = $1 WHERE id = $2").bind(status).bind(id).execute(conn).await?;
    debug!("🗃️ Connector {id} status set to {status}");
    Ok(())
}

pub async fn mark_connector_synced(id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE connectors SET last_sync_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
