use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Datelike;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::BucketStore;
use crate::error::{StoreError, StoreResult};

// ════════════════════════════════════════════════════════════════
//  Per-partition locks
// ════════════════════════════════════════════════════════════════

/// In-process mutex per partition identifier.
///
/// Serializes the "does the file exist / write or extend" sequence for
/// appenders inside this process. Writers in other processes are not
/// covered: no file lock is taken.
#[derive(Debug, Default)]
pub(crate) struct PartitionLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PartitionLocks {
    fn get(&self, identifier: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(identifier.to_string()).or_default().clone()
    }

    /// Drop the lock entry of a partition nobody is appending to.
    pub(crate) fn forget(&self, identifier: &str) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if map.get(identifier).is_some_and(|l| Arc::strong_count(l) == 1) {
            map.remove(identifier);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// ════════════════════════════════════════════════════════════════
//  Append
// ════════════════════════════════════════════════════════════════

impl BucketStore {
    /// Append `record` to the partition of `date` and hand it back.
    ///
    /// A missing (or empty) partition gets the record as its whole content;
    /// an existing one is extended with `\n` + record, so the file never ends
    /// with a newline.
    pub async fn append<D, R>(&self, date: &D, record: R) -> StoreResult<R>
    where
        D: Datelike,
        R: Serialize,
    {
        let identifier = self.key.identifier_for(date);
        let path = self.key.path_for_identifier(&identifier);
        let line = serde_json::to_string(&record).map_err(StoreError::Encode)?;

        let lock = self.locks.get(&identifier);
        let _guard = lock.lock().await;

        let root = self.key.root();
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| StoreError::io("mkdir", root, e))?;

        let has_content = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::io("stat", &path, e)),
        };
        let payload = if has_content { format!("\n{line}") } else { line };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::io("open", &path, e))?;
        file.write_all(payload.as_bytes())
            .await
            .map_err(|e| StoreError::io("write", &path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io("flush", &path, e))?;

        tracing::debug!(
            partition = %identifier,
            bytes = payload.len(),
            created = !has_content,
            "appended record"
        );
        Ok(record)
    }

    /// [`append`](Self::append) for the current date of the configured clock.
    pub async fn append_now<R: Serialize>(&self, record: R) -> StoreResult<R> {
        let now = self.now();
        self.append(&now, record).await
    }
}
