use phone_registry_domain::storage::StorageResult;
use sea_orm::{ConnectOptions, ConnectionTrait, Database};
use tracing::debug;

use crate::{errors::from_db, migration::run_migrations, SeaOrmStorage, StorageError};

#[derive(Default)]
pub struct StorageBuilder {
    database_url: Option<String>,
    max_connections: Option<u32>,
}

impl StorageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Caps the connection pool. Left unset, SeaORM picks its own default.
    pub fn max_connections(mut self, max: Option<u32>) -> Self {
        self.max_connections = max;
        self
    }

    pub async fn build(self) -> StorageResult<SeaOrmStorage> {
        let url = self
            .database_url
            .ok_or_else(|| StorageError::Database("missing database url".into()))?;
        let mut options = ConnectOptions::new(url);
        if let Some(max) = self.max_connections {
            options.max_connections(max);
        }
        let db = Database::connect(options).await.map_err(from_db)?;
        run_migrations(&db).await?;
        debug!(
            backend = ?db.get_database_backend(),
            max_connections = ?self.max_connections,
            "database schema ready"
        );
        Ok(SeaOrmStorage::from_connection(db))
    }
}
