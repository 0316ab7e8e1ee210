use std::time::Instant;

use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::config::RecordArgs;
use crate::error::ServerError;

/// One collection cycle: sweep stale days, then append the record for now.
pub async fn run(args: RecordArgs) -> Result<(), ServerError> {
    let started = Instant::now();
    let (_, store) = super::open(&args.common)?;

    let raw = match &args.file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let record: Value = serde_json::from_str(&raw)?;

    let report = store.cleanup_now().await;
    if !report.removed.is_empty() {
        tracing::info!(removed = report.removed.len(), "swept stale partitions");
    }

    let now = store.now();
    store.append(&now, record).await?;
    tracing::info!(
        partition = %store.key().identifier_for(&now),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "recorded"
    );
    Ok(())
}
