//! Date-partitioned append-only record store.
//!
//! One file per calendar day under a storage root, one JSON value per line:
//!
//! ```text
//! {data_dir}/
//! ├── 2026_9_17.db
//! ├── 2026_9_18.db
//! └── 2026_9_19.db     {"v":1}\n{"v":2}
//! ```
//!
//! Writes append to today's partition, reads fan out over the trailing
//! retention window, and a sweep deletes partitions that fell out of it.
//! Nothing is cached between calls; every read re-parses from disk.

pub mod aggregate;
pub mod append;
pub mod config;
pub mod error;
pub mod key;
pub mod reader;
pub mod retention;
pub mod sweep;

use std::path::Path;

use chrono::{DateTime, FixedOffset};

pub use aggregate::History;
pub use config::{ClockZone, IdFormat, StoreConfig};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use key::BucketKey;
pub use retention::RetentionWindow;
pub use sweep::SweepReport;

use append::PartitionLocks;

// ════════════════════════════════════════════════════════════════
//  BucketStore
// ════════════════════════════════════════════════════════════════

/// A store rooted at one directory. Cheap to share behind an `Arc`;
/// all operations take `&self`.
#[derive(Debug)]
pub struct BucketStore {
    key: BucketKey,
    window: RetentionWindow,
    clock: ClockZone,
    locks: PartitionLocks,
}

impl BucketStore {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let key = BucketKey::new(config.data_dir, config.suffix, config.id_format);
        let window = RetentionWindow::new(key.clone(), config.retention_days);
        Ok(Self {
            key,
            window,
            clock: config.time_zone,
            locks: PartitionLocks::default(),
        })
    }

    pub fn key(&self) -> &BucketKey {
        &self.key
    }

    pub fn window(&self) -> &RetentionWindow {
        &self.window
    }

    pub fn root(&self) -> &Path {
        self.key.root()
    }

    /// Current instant in the configured zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }
}
