//! Option (settings) table

use crate::Storage;
use async_trait::async_trait;
use scrub_core::OptionStore;

#[async_trait]
impl OptionStore for Storage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM options WHERE name = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO options (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM options WHERE name = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::{OPTION_KEY, ScrubFlag, ScrubGate, lifecycle};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_option_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("opts.db"))).await.unwrap();

        assert_eq!(storage.get(OPTION_KEY).await.unwrap(), None);
        storage.set(OPTION_KEY, "yes").await.unwrap();
        storage.set(OPTION_KEY, "no").await.unwrap();
        assert_eq!(storage.get(OPTION_KEY).await.unwrap().as_deref(), Some("no"));
        storage.delete(OPTION_KEY).await.unwrap();
        storage.delete(OPTION_KEY).await.unwrap();
        assert_eq!(storage.get(OPTION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.db");

        {
            let storage = Storage::new(Some(path.clone())).await.unwrap();
            let gate = ScrubGate::new(Arc::new(storage));
            lifecycle::activate(&gate, true).await.unwrap();
        }

        let storage = Storage::new(Some(path)).await.unwrap();
        let gate = ScrubGate::new(Arc::new(storage));
        assert_eq!(gate.flag_state().await.unwrap(), ScrubFlag::Enabled);
    }
}
