use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::BucketStore;
use crate::key::BucketKey;
use crate::reader::read_partition;

/// Per-day view over the retention window. `None` means the partition was
/// missing or unreadable; that is a normal state here, not an error.
pub type History<T = Value> = BTreeMap<String, Option<Vec<T>>>;

impl BucketStore {
    /// Load every live partition concurrently and collect one entry per live
    /// identifier.
    ///
    /// Never fails: any per-partition error becomes `None`. There is no cap
    /// on in-flight reads, so a window of N days opens up to N files at once.
    ///
    /// Has exactly N entries when `now` carries a fixed offset, as
    /// [`all_now`](Self::all_now) does. Under a zone with DST transitions
    /// (`DateTime<Local>`) stepping back 24h can repeat a date, leaving N-1.
    pub async fn all<Tz, T>(&self, now: &DateTime<Tz>) -> History<T>
    where
        Tz: TimeZone,
        T: DeserializeOwned,
    {
        let loads = self.window.live_identifiers(now).into_iter().map(|identifier| async move {
            let path = self.key.path_for_identifier(&identifier);
            let outcome = match read_partition::<T>(&path).await {
                Ok(records) => Some(records),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(partition = %identifier, "partition missing");
                    None
                }
                Err(e) => {
                    tracing::warn!(partition = %identifier, error = %e, "partition unreadable");
                    None
                }
            };
            (identifier, outcome)
        });

        futures::future::join_all(loads).await.into_iter().collect()
    }

    pub async fn all_now<T: DeserializeOwned>(&self) -> History<T> {
        let now = self.now();
        self.all(&now).await
    }
}

/// Entries of `history` oldest first, by calendar date rather than by the
/// (possibly unpadded) identifier text.
pub fn chronological<'a, T>(
    key: &BucketKey,
    history: &'a History<T>,
) -> Vec<(&'a str, Option<&'a [T]>)> {
    let mut entries: Vec<(&str, Option<&[T]>)> = history
        .iter()
        .map(|(id, records)| (id.as_str(), records.as_deref()))
        .collect();
    entries.sort_by(|a, b| key.compare_identifiers(a.0, b.0));
    entries
}
