//! Database operations

use crate::{Comment, Result, StorageError};
use async_trait::async_trait;
use scrub_core::{MaskedValue, NewComment, RecordId, RecordStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;

// Shared by the id query and the count query so the two cannot drift.
macro_rules! pending_predicate {
    () => {
        "author_ip <> ?1"
    };
}

const PENDING_IDS_SQL: &str = concat!(
    "SELECT id FROM comments WHERE ",
    pending_predicate!(),
    " ORDER BY id ASC"
);

const PENDING_COUNT_SQL: &str = concat!(
    "SELECT COUNT(*) FROM comments WHERE ",
    pending_predicate!()
);

/// Main storage interface. Cheap to clone (shares the pool).
#[derive(Clone)]
pub struct Storage {
    pub(crate) pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database and run migrations.
    /// `None` uses the platform data directory.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!(path = %path.display(), "storage ready");
        Ok(Self { pool })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "scrub", "scrub").ok_or_else(|| {
            StorageError::Other(anyhow::anyhow!("could not determine data directory"))
        })?;
        Ok(dirs.data_dir().join("scrub.db"))
    }

    /// Persist a comment exactly as given and return the stored row
    pub async fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let post_id = i64::try_from(comment.post_id)
            .map_err(|_| anyhow::anyhow!("post id {} out of range", comment.post_id))?;

        let result = sqlx::query(
            "INSERT INTO comments (post_id, author, author_email, author_ip, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(post_id)
        .bind(&comment.author)
        .bind(&comment.author_email)
        .bind(&comment.author_ip)
        .bind(&comment.content)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .execute(&self.pool)
        .await?;

        self.get_comment(RecordId(result.last_insert_rowid() as u64))
            .await
    }

    pub async fn get_comment(&self, id: RecordId) -> Result<Comment> {
        let row = sqlx::query(
            "SELECT id, post_id, author, author_email, author_ip, content, created_at
             FROM comments WHERE id = ?1",
        )
        .bind(to_sql_id(id)?)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::CommentNotFound(id.get()))?;

        Comment::from_row(&row)
    }

    pub async fn list_comments(&self) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, post_id, author, author_email, author_ip, content, created_at
             FROM comments ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Comment::from_row).collect()
    }
}

fn to_sql_id(id: RecordId) -> Result<i64> {
    i64::try_from(id.get())
        .map_err(|_| StorageError::Other(anyhow::anyhow!("comment id {} out of range", id)))
}

#[async_trait]
impl RecordStore for Storage {
    async fn pending_ids(&self, masked: &MaskedValue) -> anyhow::Result<Vec<RecordId>> {
        let ids = sqlx::query_scalar::<_, i64>(PENDING_IDS_SQL)
            .bind(masked.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|id| RecordId(id as u64)).collect())
    }

    async fn count_pending(&self, masked: &MaskedValue) -> anyhow::Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(PENDING_COUNT_SQL)
            .bind(masked.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn update_address(&self, id: RecordId, masked: &MaskedValue) -> anyhow::Result<u64> {
        let sql_id = to_sql_id(id)?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE comments SET author_ip = ?1 WHERE id = ?2")
            .bind(masked.as_str())
            .bind(sql_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }
}
