use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewPerson, Person};

pub mod memory;
pub mod samples;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
pub use samples::sample_people;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Supported record store types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Memory,
    Sqlite,
}

/// Source of the records a filter session works on.
///
/// Records come back in insertion order. Writes return the full, updated
/// record list so the caller can hand it straight to the session.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored person, in insertion order
    async fn all_records(&self) -> AppResult<Vec<Person>>;

    /// Validate and store one person
    async fn insert(&self, person: NewPerson) -> AppResult<Vec<Person>>;

    /// Validate and store several people; nothing is stored if one is invalid
    async fn insert_many(&self, people: Vec<NewPerson>) -> AppResult<Vec<Person>>;

    async fn count(&self) -> AppResult<usize>;
}

/// Factory for creating store instances
pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &StoreConfig) -> AppResult<Arc<dyn RecordStore>> {
        match config.store_type {
            StoreType::Memory => Ok(Arc::new(MemoryStore::new())),
            #[cfg(feature = "sqlite")]
            StoreType::Sqlite => {
                let url = config.url.as_deref().ok_or_else(|| {
                    AppError::Configuration("store.url is required for the sqlite store".to_string())
                })?;
                let store = SqliteStore::connect(url, config.max_connections).await?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "sqlite"))]
            StoreType::Sqlite => Err(AppError::Configuration(
                "built without the sqlite feature".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_memory() {
        let store = StoreFactory::create(&StoreConfig::default()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_factory_sqlite_without_url() {
        let config = StoreConfig {
            store_type: StoreType::Sqlite,
            url: None,
            max_connections: 1,
        };
        assert!(matches!(
            StoreFactory::create(&config).await,
            Err(AppError::Configuration(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_factory_sqlite_memory() {
        let config = StoreConfig {
            store_type: StoreType::Sqlite,
            url: Some("sqlite::memory:".to_string()),
            max_connections: 4,
        };
        let store = StoreFactory::create(&config).await.unwrap();
        let records = store.insert_many(sample_people()).await.unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(store.count().await.unwrap(), 8);
    }
}
