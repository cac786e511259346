use crate::db_types::{Connector, ListingStatus, NewConnector};

#[allow(async_fn_in_trait)]
pub trait ConnectorManagement: Clone {
    type Error: std::error::Error;

    /// Inserts the connector, or refreshes the access token, name and status
    /// of an existing connector for the same shop domain. Connectors are never
    /// hard-deleted, so a re-install reactivates the original row.
    async fn upsert_connector(&self, connector: NewConnector) -> Result<Connector, Self::Error>;

    async fn fetch_connector(&self, id: i64) -> Result<Option<Connector>, Self::Error>;

    async fn fetch_connector_by_shop(&self, shop_domain: &str) -> Result<Option<Connector>, Self::Error>;

    async fn set_connector_status(&self, id: i64, status: ListingStatus) -> Result<(), Self::Error>;

    /// Stamps `last_sync_at` with the current time.
    async fn mark_connector_synced(&self, id: i64) -> Result<(), Self::Error>;
}
