use serde_json::Value;

use daylog_store::History;
use daylog_store::aggregate::chronological;

use crate::config::{ConfigArgs, LoadArgs};
use crate::error::ServerError;

pub async fn load(args: LoadArgs) -> Result<(), ServerError> {
    let (_, store) = super::open(&args.common)?;
    let records: Vec<Value> = store.load(&args.date).await?;
    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    tracing::debug!(date = %args.date, count = records.len(), "loaded partition");
    Ok(())
}

/// Pretty JSON object, keys in calendar order.
pub async fn history(args: ConfigArgs) -> Result<(), ServerError> {
    let (_, store) = super::open(&args)?;
    let history: History = store.all_now().await;

    let mut ordered = serde_json::Map::new();
    for (identifier, records) in chronological(store.key(), &history) {
        let value = match records {
            Some(records) => Value::Array(records.to_vec()),
            None => Value::Null,
        };
        ordered.insert(identifier.to_string(), value);
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(ordered))?);
    Ok(())
}

pub async fn sweep(args: ConfigArgs) -> Result<(), ServerError> {
    let (_, store) = super::open(&args)?;
    let report = store.cleanup_now().await;
    for path in &report.removed {
        tracing::info!(path = %path.display(), "removed");
    }
    for path in &report.failed {
        tracing::warn!(path = %path.display(), "could not remove");
    }
    tracing::info!(
        scanned = report.scanned,
        removed = report.removed.len(),
        failed = report.failed.len(),
        "retention sweep"
    );
    Ok(())
}

/// Every partition file, oldest first, tagged live or stale as of now.
pub async fn list(args: ConfigArgs) -> Result<(), ServerError> {
    let (_, store) = super::open(&args)?;
    let now = store.now();
    for path in store.all_partition_paths().await? {
        let live = store
            .key()
            .identifier_of_path(&path)
            .is_some_and(|id| store.window().contains(&id, &now));
        println!("{}\t{}", path.display(), if live { "live" } else { "stale" });
    }
    Ok(())
}
