use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::RecordStore;
use crate::error::AppResult;
use crate::models::{NewPerson, Person};

/// Process-local store; data lives as long as the service
#[derive(Debug, Default)]
pub struct MemoryStore {
    people: RwLock<Vec<Person>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn all_records(&self) -> AppResult<Vec<Person>> {
        Ok(self.people.read().await.clone())
    }

    async fn insert(&self, person: NewPerson) -> AppResult<Vec<Person>> {
        self.insert_many(vec![person]).await
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> AppResult<Vec<Person>> {
        let validated = people
            .into_iter()
            .map(NewPerson::into_person)
            .collect::<AppResult<Vec<_>>>()?;

        let mut stored = self.people.write().await;
        info!(added = validated.len(), "people stored in memory");
        stored.extend(validated);
        Ok(stored.clone())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.people.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::sample_people;

    #[tokio::test]
    async fn test_insert_keeps_order() {
        let store = MemoryStore::new();
        store.insert(NewPerson::new("Jean", "Dupont", 30)).await.unwrap();
        let records = store
            .insert(NewPerson::new("Marie", "Martin", 25))
            .await
            .unwrap();

        let names: Vec<&str> = records.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, vec!["Jean", "Marie"]);
        assert_eq!(store.all_records().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_invalid_person_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert(NewPerson::new("Jean", "Dupont", 12))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let store = MemoryStore::new();
        let mut people = sample_people();
        people.push(NewPerson::new("", "Nobody", 30));

        assert!(store.insert_many(people).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);

        store.insert_many(sample_people()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 8);
    }
}
