use anyhow::{Context as _, Result, bail};
use scrub_core::{
    BatchMode, BatchOptions, BatchOutcome, CancelFlag, ProgressSink, RecordId, WorkSet,
};
use std::io::Write;

use super::Context;

/// Single-line progress counter on stderr
struct ConsoleProgress {
    total: usize,
    done: usize,
    failed: Vec<RecordId>,
}

impl ConsoleProgress {
    fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            failed: Vec::new(),
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn tick(&mut self, id: RecordId, ok: bool) {
        self.done += 1;
        if !ok {
            self.failed.push(id);
        }
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\rScrubbing comments: {}/{}", self.done, self.total);
        let _ = stderr.flush();
    }

    fn finish(&mut self, _outcome: &BatchOutcome) {
        if self.done > 0 {
            eprintln!();
        }
    }
}

pub async fn handle(ctx: &Context, stop_on_error: bool) -> Result<()> {
    let cancel = CancelFlag::new();
    let listener = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted, finishing the current comment...");
                cancel.cancel();
            }
        })
    };

    let options = BatchOptions {
        mode: BatchMode::from_stop_on_first_error(stop_on_error),
        cancel: Some(cancel),
    };
    let result = execute(ctx, options).await;
    listener.abort();

    result
}

/// Run the cleanup and turn anything short of a complete pass into an error
async fn execute(ctx: &Context, options: BatchOptions) -> Result<()> {
    let report = run(ctx, options).await?;
    let outcome = report.outcome;

    if outcome.is_complete_success() {
        println!(
            "✓ Scrubbed {} comments to {}",
            outcome.succeeded,
            ctx.gate.masked_value()
        );
        return Ok(());
    }

    println!(
        "Scrubbed {} of {} comments ({} failed)",
        outcome.succeeded, report.total, outcome.failed
    );

    if outcome.has_failures() {
        let ids: Vec<String> = report.failed_ids.iter().map(ToString::to_string).collect();
        bail!(
            "{} comment(s) could not be updated: {}",
            outcome.failed,
            ids.join(", ")
        );
    }

    bail!("Cleanup interrupted; run `scrub cleanup` again to finish")
}

struct CleanupReport {
    outcome: BatchOutcome,
    total: usize,
    failed_ids: Vec<RecordId>,
}

/// Locate pending comments and scrub them
async fn run(ctx: &Context, options: BatchOptions) -> Result<CleanupReport> {
    if !ctx.gate.is_enabled().await {
        bail!("IP scrubbing is not enabled. Run `scrub enable` first.");
    }

    let ids = match ctx
        .locator
        .find_pending()
        .await
        .context("There was an error attempting to retrieve the comments")?
    {
        WorkSet::Empty => bail!("There are no comments requiring update at this time."),
        WorkSet::Pending(ids) => ids,
    };

    println!("Found {} comment(s) to update", ids.len());

    let mut progress = ConsoleProgress::new(ids.len());
    let outcome = ctx
        .engine
        .run_batch(&ids, options, &mut progress)
        .await
        .context("There was an error attempting to update the comments")?;

    Ok(CleanupReport {
        outcome,
        total: ids.len(),
        failed_ids: progress.failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use scrub_core::memory::MemoryRecordStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cleanup_scrubs_pending() {
        let t = testing::context(&["203.0.113.9", "127.0.0.1", "2001:db8::1"]).await;
        t.ctx.gate.set_enabled(true).await.unwrap();

        handle(&t.ctx, false).await.unwrap();

        for comment in t.ctx.storage.list_comments().await.unwrap() {
            assert_eq!(comment.author_ip, "127.0.0.1");
        }
        assert_eq!(t.ctx.locator.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_requires_enabled_flag() {
        let t = testing::context(&["203.0.113.9"]).await;

        let err = handle(&t.ctx, false).await.unwrap_err();
        assert!(err.to_string().contains("not enabled"));
        assert_eq!(
            t.ctx.storage.list_comments().await.unwrap()[0].author_ip,
            "203.0.113.9"
        );
    }

    #[tokio::test]
    async fn test_cleanup_with_nothing_pending_fails() {
        let t = testing::context(&["127.0.0.1"]).await;
        t.ctx.gate.set_enabled(true).await.unwrap();

        let err = handle(&t.ctx, true).await.unwrap_err();
        assert!(err.to_string().contains("no comments requiring update"));
    }

    #[tokio::test]
    async fn test_cleanup_uses_masked_override() {
        let t = testing::context(&["203.0.113.9"]).await;
        let ctx = super::Context::new(
            t.ctx.storage.clone(),
            t.ctx.config.clone(),
            Some("10.1.2.3".to_string()),
        );
        ctx.gate.set_enabled(true).await.unwrap();

        handle(&ctx, true).await.unwrap();
        assert_eq!(
            ctx.storage.list_comments().await.unwrap()[0].author_ip,
            "10.1.2.3"
        );
    }

    fn three_pending() -> Arc<MemoryRecordStore> {
        Arc::new(MemoryRecordStore::with_records([
            (1, "203.0.113.1"),
            (2, "203.0.113.2"),
            (3, "203.0.113.3"),
        ]))
    }

    #[tokio::test]
    async fn test_partial_failure_exits_with_error() {
        let records = three_pending();
        records.fail_updates_for(RecordId(2));
        let t = testing::memory_context(records.clone()).await;

        let err = execute(&t.ctx, BatchOptions::best_effort()).await.unwrap_err();
        assert_eq!(err.to_string(), "1 comment(s) could not be updated: 2");

        assert_eq!(records.attempted(), vec![RecordId(1), RecordId(2), RecordId(3)]);
        assert_eq!(records.address(RecordId(1)).as_deref(), Some("127.0.0.1"));
        assert_eq!(records.address(RecordId(3)).as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_stop_on_error_aborts_batch() {
        let records = three_pending();
        records.fail_updates_for(RecordId(2));
        let t = testing::memory_context(records.clone()).await;

        let err = execute(&t.ctx, BatchOptions::fail_fast()).await.unwrap_err();
        assert!(err.to_string().contains("update the comments"));
        assert_eq!(records.address(RecordId(3)).as_deref(), Some("203.0.113.3"));
    }

    #[tokio::test]
    async fn test_query_failure_exits_with_error() {
        let records = three_pending();
        records.fail_queries(true);
        let t = testing::memory_context(records.clone()).await;

        let err = execute(&t.ctx, BatchOptions::best_effort()).await.unwrap_err();
        assert!(err.to_string().contains("retrieve the comments"));
        assert!(records.attempted().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_run_exits_with_error() {
        let records = three_pending();
        let t = testing::memory_context(records.clone()).await;

        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = execute(&t.ctx, BatchOptions::best_effort().with_cancel(cancel))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("interrupted"));
        assert!(records.attempted().is_empty());
    }
}
