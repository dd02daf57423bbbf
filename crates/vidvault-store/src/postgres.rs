//! PostgreSQL-backed catalog.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};
use vidvault_models::{Video, VideoId};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::metrics::record_operation;
use crate::repo::VideoStore;

/// Row shape of the `videos` table.
#[derive(Debug, Clone, FromRow)]
struct VideoRow {
    id: String,
    title: String,
    description: Option<String>,
    public_id: String,
    duration: f64,
    original_size: i64,
    compressed_size: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VideoRow> for Video {
    type Error = StoreError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let size = |value: i64, field: &str| {
            u64::try_from(value).map_err(|_| {
                StoreError::InvalidRecord(format!("video {} has negative {}", row.id, field))
            })
        };
        let original_size = size(row.original_size, "original_size")?;
        let compressed_size = size(row.compressed_size, "compressed_size")?;

        Ok(Video {
            id: VideoId::from_string(row.id),
            title: row.title,
            description: row.description,
            public_id: row.public_id,
            duration: row.duration,
            original_size,
            compressed_size,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Catalog stored in a PostgreSQL `videos` table.
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        debug!(
            "Creating database pool: max={}, acquire_timeout={:?}",
            config.max_connections, config.acquire_timeout
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Apply embedded schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Insert a record, returning it as stored.
    pub async fn insert(&self, video: &Video) -> StoreResult<Video> {
        let original_size = i64::try_from(video.original_size)
            .map_err(|_| StoreError::InvalidRecord("original_size out of range".to_string()))?;
        let compressed_size = i64::try_from(video.compressed_size)
            .map_err(|_| StoreError::InvalidRecord("compressed_size out of range".to_string()))?;

        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            INSERT INTO videos (id, title, description, public_id, duration,
                                original_size, compressed_size, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, public_id, duration,
                      original_size, compressed_size, created_at, updated_at
            "#,
        )
        .bind(video.id.as_str())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.public_id)
        .bind(video.duration)
        .bind(original_size)
        .bind(compressed_size)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn list(&self) -> StoreResult<Vec<Video>> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, title, description, public_id, duration,
                   original_size, compressed_size, created_at, updated_at
            FROM videos
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        record_operation("list", result.is_ok(), start.elapsed().as_secs_f64());

        result?.into_iter().map(Video::try_from).collect()
    }

    async fn delete(&self, id: &VideoId) -> StoreResult<()> {
        let start = Instant::now();
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await;
        record_operation("delete", result.is_ok(), start.elapsed().as_secs_f64());

        if result?.rows_affected() == 0 {
            return Err(StoreError::not_found(id.as_str()));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(original_size: i64) -> VideoRow {
        VideoRow {
            id: "v1".to_string(),
            title: "Title".to_string(),
            description: None,
            public_id: "p1".to_string(),
            duration: 10.0,
            original_size,
            compressed_size: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let video = Video::try_from(row(100)).unwrap();
        assert_eq!(video.id.as_str(), "v1");
        assert_eq!(video.original_size, 100);
        assert_eq!(video.compressed_size, 10);
    }

    #[test]
    fn test_row_with_negative_size_rejected() {
        assert!(matches!(
            Video::try_from(row(-1)),
            Err(StoreError::InvalidRecord(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
    async fn test_postgres_list_and_delete() {
        let config = StoreConfig::from_env().expect("DATABASE_URL");
        let store = PgVideoStore::connect(&config).await.unwrap();
        store.migrate().await.unwrap();

        let now = Utc::now();
        let older = Video::new("older", "p-old", 1.0, 10, 5).created(now - Duration::hours(1));
        let newer = Video::new("newer", "p-new", 1.0, 10, 5).created(now);
        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();

        let listed = store.list().await.unwrap();
        let pos_new = listed.iter().position(|v| v.id == newer.id).unwrap();
        let pos_old = listed.iter().position(|v| v.id == older.id).unwrap();
        assert!(pos_new < pos_old);

        store.delete(&newer.id).await.unwrap();
        store.delete(&older.id).await.unwrap();
        assert!(store.delete(&older.id).await.unwrap_err().is_not_found());
    }
}
