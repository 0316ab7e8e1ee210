use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, TimeZone};

use crate::BucketStore;
use crate::error::{StoreError, StoreResult};

/// What a sweep did. Informational only; a sweep never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Partition files found under the root.
    pub scanned: usize,
    pub removed: Vec<PathBuf>,
    /// Stale partitions whose deletion failed (already gone, permissions...).
    pub failed: Vec<PathBuf>,
}

impl BucketStore {
    // ── Listing ──

    /// Every partition file under the root, whether live or not, oldest first.
    pub async fn all_partition_paths(&self) -> StoreResult<Vec<PathBuf>> {
        let root = self.key.root();
        let mut dir = tokio::fs::read_dir(root)
            .await
            .map_err(|e| StoreError::io("read_dir", root, e))?;

        let mut found: Vec<(String, PathBuf)> = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::io("read_dir", root, e))?
        {
            let is_file = match entry.file_type().await {
                Ok(t) => t.is_file(),
                Err(_) => continue,
            };
            if !is_file {
                continue;
            }
            let path = root.join(entry.file_name());
            if let Some(identifier) = self.key.identifier_of_path(&path) {
                found.push((identifier, path));
            }
        }

        found.sort_by(|a, b| self.key.compare_identifiers(&a.0, &b.0));
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    // ── Sweep ──

    /// Delete every partition outside the retention window as of `now`.
    ///
    /// Live partitions are never touched. A root that cannot be listed makes
    /// this a no-op; individual deletion failures are recorded and skipped.
    ///
    /// The live set comes from stepping `now` back in 24h increments, so with
    /// a zone that observes DST (`DateTime<Local>`) one date can be produced
    /// twice and the oldest day of the window dropped.
    /// [`cleanup_now`](Self::cleanup_now) uses a fixed offset and is not affected.
    pub async fn cleanup<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SweepReport {
        let live: HashSet<PathBuf> = self
            .window
            .live_identifiers(now)
            .iter()
            .map(|id| self.key.path_for_identifier(id))
            .collect();

        let present = match self.all_partition_paths().await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::debug!(error = %e, "sweep skipped: storage root not listable");
                return SweepReport::default();
            }
        };

        let mut report = SweepReport {
            scanned: present.len(),
            ..SweepReport::default()
        };
        let stale: Vec<PathBuf> = present.into_iter().filter(|p| !live.contains(p)).collect();
        if stale.is_empty() {
            return report;
        }

        let deletions = stale.into_iter().map(|path| async move {
            let result = tokio::fs::remove_file(&path).await;
            (path, result)
        });
        for (path, result) in futures::future::join_all(deletions).await {
            match result {
                Ok(()) => {
                    if let Some(identifier) = self.key.identifier_of_path(&path) {
                        self.locks.forget(&identifier);
                    }
                    tracing::debug!(path = %path.display(), "removed stale partition");
                    report.removed.push(path);
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "stale partition not removed");
                    report.failed.push(path);
                }
            }
        }
        report
    }

    pub async fn cleanup_now(&self) -> SweepReport {
        let now = self.now();
        self.cleanup(&now).await
    }

    // ── Remove ──

    /// Delete the partition of `date`. Errors are swallowed; returns whether
    /// a file was actually removed.
    pub async fn remove<D: Datelike>(&self, date: &D) -> bool {
        let path = self.key.path_for(date);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                self.locks.forget(&self.key.identifier_for(date));
                tracing::debug!(path = %path.display(), "removed partition");
                true
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "partition not removed");
                false
            }
        }
    }
}
