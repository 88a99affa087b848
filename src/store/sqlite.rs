use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::RecordStore;
use crate::error::{AppError, AppResult};
use crate::models::{NewPerson, Person};

/// Store backed by a SQLite database through a sqlx pool
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and create the `persons` table if needed
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        // Every connection to an in-memory database opens its own database
        let in_memory = url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { max_connections };

        let mut options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30));
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }

        let pool = options
            .connect(url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(url, "sqlite store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> AppResult<()> {
        // seq keeps insertion order
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS persons (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                age INTEGER NOT NULL,
                department TEXT NOT NULL,
                country TEXT NOT NULL,
                is_bool INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create persons table: {}", e)))?;

        Ok(())
    }

    fn row_to_person(row: &SqliteRow) -> AppResult<Person> {
        let id: String = row.try_get("id").map_err(read_error)?;
        let id = Uuid::parse_str(&id)
            .map_err(|e| AppError::Database(format!("Invalid person id {}: {}", id, e)))?;

        Ok(Person {
            id,
            first_name: row.try_get("first_name").map_err(read_error)?,
            last_name: row.try_get("last_name").map_err(read_error)?,
            date_of_birth: row
                .try_get::<DateTime<Utc>, _>("date_of_birth")
                .map_err(read_error)?,
            age: row.try_get("age").map_err(read_error)?,
            department: row.try_get("department").map_err(read_error)?,
            country: row.try_get("country").map_err(read_error)?,
            is_bool: row.try_get("is_bool").map_err(read_error)?,
        })
    }
}

fn read_error(e: sqlx::Error) -> AppError {
    AppError::Database(format!("Failed to read person: {}", e))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn all_records(&self) -> AppResult<Vec<Person>> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, date_of_birth, age, department, country, is_bool \
             FROM persons ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch persons: {}", e)))?;

        rows.iter().map(Self::row_to_person).collect()
    }

    async fn insert(&self, person: NewPerson) -> AppResult<Vec<Person>> {
        self.insert_many(vec![person]).await
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> AppResult<Vec<Person>> {
        let validated = people
            .into_iter()
            .map(NewPerson::into_person)
            .collect::<AppResult<Vec<_>>>()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for person in &validated {
            sqlx::query(
                "INSERT INTO persons (id, first_name, last_name, date_of_birth, age, department, country, is_bool) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(person.id.to_string())
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(person.date_of_birth)
            .bind(person.age)
            .bind(&person.department)
            .bind(&person.country)
            .bind(person.is_bool)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert person: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        info!(added = validated.len(), "people stored in sqlite");
        self.all_records().await
    }

    async fn count(&self) -> AppResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM persons")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count persons: {}", e)))?;

        Ok(count as usize)
    }
}
