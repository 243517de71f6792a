use scrub_core::RecordId;
use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

/// A persisted comment
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: RecordId,
    pub post_id: u64,
    pub author: String,
    pub author_email: String,
    pub author_ip: String,
    pub content: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl Comment {
    pub(crate) fn from_row(row: &SqliteRow) -> crate::Result<Self> {
        let created_at: i64 = row.try_get("created_at")?;
        Ok(Self {
            id: RecordId(row.try_get::<i64, _>("id")? as u64),
            post_id: row.try_get::<i64, _>("post_id")? as u64,
            author: row.try_get("author")?,
            author_email: row.try_get("author_email")?,
            author_ip: row.try_get("author_ip")?,
            content: row.try_get("content")?,
            created_at: OffsetDateTime::from_unix_timestamp(created_at)
                .map_err(|e| anyhow::anyhow!("invalid created_at {}: {}", created_at, e))?,
        })
    }
}
