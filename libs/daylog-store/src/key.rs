use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::config::IdFormat;

// ════════════════════════════════════════════════════════════════
//  BucketKey
// ════════════════════════════════════════════════════════════════

/// Maps calendar dates to partition identifiers and file paths.
///
/// Pure: no I/O. Every caller that needs a partition name goes through
/// here so the write and read paths always agree on the spelling.
#[derive(Debug, Clone)]
pub struct BucketKey {
    root: PathBuf,
    suffix: String,
    format: IdFormat,
}

impl BucketKey {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>, format: IdFormat) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn format(&self) -> IdFormat {
        self.format
    }

    pub fn identifier_for<D: Datelike>(&self, date: &D) -> String {
        match self.format {
            IdFormat::Legacy => format!("{}_{}_{}", date.year(), date.month0(), date.day()),
            IdFormat::Iso => format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
        }
    }

    /// `{root}/{identifier}{suffix}`
    pub fn path_for<D: Datelike>(&self, date: &D) -> PathBuf {
        self.path_for_identifier(&self.identifier_for(date))
    }

    pub fn path_for_identifier(&self, identifier: &str) -> PathBuf {
        self.root.join(format!("{identifier}{}", self.suffix))
    }

    /// Inverse of [`identifier_for`](Self::identifier_for). Only canonical
    /// spellings are accepted (`2026_09_19` is not a legacy identifier).
    pub fn date_of(&self, identifier: &str) -> Option<NaiveDate> {
        let sep = match self.format {
            IdFormat::Legacy => '_',
            IdFormat::Iso => '-',
        };
        let mut parts = identifier.splitn(3, sep);
        let year: i32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts.next()?.parse().ok()?;
        let month = match self.format {
            IdFormat::Legacy => month.checked_add(1)?,
            IdFormat::Iso => month,
        };
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        (self.identifier_for(&date) == identifier).then_some(date)
    }

    /// File name without the suffix, if `path` looks like a partition file.
    pub fn identifier_of_path(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let id = name.strip_suffix(self.suffix.as_str())?;
        (!id.is_empty()).then(|| id.to_string())
    }

    /// Date-aware ordering of identifiers.
    ///
    /// Legacy identifiers do not sort lexically (`2026_9_19` > `2026_10_1`),
    /// so anything presenting partitions in order must use this. Identifiers
    /// that do not parse sort after all dated ones.
    pub fn compare_identifiers(&self, a: &str, b: &str) -> Ordering {
        match (self.date_of(a), self.date_of(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}
