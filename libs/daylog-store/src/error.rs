use std::path::{Path, PathBuf};

/// Category of a store error. Lets callers decide whether a failure is a
/// missing/unreadable partition, bad content, or a setup mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration — permanent, fail at startup.
    Config,
    /// Filesystem error (not found, permission, disk full, listing).
    Io,
    /// A record could not be encoded or a partition line could not be decoded.
    Format,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line` is 1-based.
    #[error("parse {}:{line}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Io { .. } => ErrorKind::Io,
            StoreError::Parse { .. } | StoreError::Encode(_) => ErrorKind::Format,
            StoreError::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the partition file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_io_kind() {
        let err = StoreError::io(
            "read",
            Path::new("data/2026_9_19.db"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            format!("read data/2026_9_19.db: {}", std::io::Error::from(std::io::ErrorKind::NotFound))
        );
    }

    #[test]
    fn parse_error_is_format_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = StoreError::Parse {
            path: PathBuf::from("data/x.db"),
            line: 3,
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("parse data/x.db:3: "));
    }
}
