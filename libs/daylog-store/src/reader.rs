use std::path::Path;

use chrono::Datelike;
use serde::de::DeserializeOwned;

use crate::BucketStore;
use crate::error::{StoreError, StoreResult};

impl BucketStore {
    /// Every record of the partition of `date`, in append order.
    ///
    /// Fails if the file is missing or unreadable, or if any single line
    /// does not decode as `T`.
    pub async fn load<D, T>(&self, date: &D) -> StoreResult<Vec<T>>
    where
        D: Datelike,
        T: DeserializeOwned,
    {
        read_partition(&self.key.path_for(date)).await
    }
}

pub(crate) async fn read_partition<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::io("read", path, e))?;
    decode_partition(path, &contents)
}

/// Parse newline-delimited JSON. An empty partition is an empty sequence;
/// otherwise every line, blank ones included, must hold one value.
///
/// Works on raw bytes so that a line with invalid UTF-8 is a parse error of
/// that line, not a failed read of the whole file.
pub fn decode_partition<T: DeserializeOwned>(path: &Path, contents: &[u8]) -> StoreResult<Vec<T>> {
    if contents.is_empty() {
        return Ok(Vec::new());
    }
    contents
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_slice(line).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decode(contents: &str) -> StoreResult<Vec<Value>> {
        decode_partition(Path::new("p.db"), contents.as_bytes())
    }

    #[test]
    fn decodes_each_line_in_order() {
        let records = decode("{\"v\":1}\n[1,2]\n\"s\"\n3").unwrap();
        assert_eq!(records, vec![json!({"v": 1}), json!([1, 2]), json!("s"), json!(3)]);
    }

    #[test]
    fn empty_contents_is_empty_partition() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn bad_line_fails_whole_partition_with_line_number() {
        let err = decode("{\"v\":1}\n{\"v\":\n{\"v\":3}").unwrap_err();
        match err {
            StoreError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn torn_trailing_newline_is_rejected() {
        assert!(matches!(decode("1\n2\n"), Err(StoreError::Parse { line: 3, .. })));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error_of_its_line() {
        let err = decode_partition::<Value>(Path::new("p.db"), b"{\"v\":1}\n{\"v\":\"\xff\xfe\"}")
            .unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 2, .. }), "{err:?}");

        let err = decode_partition::<Value>(Path::new("p.db"), b"\xff\n1").unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn typed_decode_checks_shape() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Sample {
            v: u32,
        }
        let ok: Vec<Sample> = decode_partition(Path::new("p"), b"{\"v\":1}\n{\"v\":2}").unwrap();
        assert_eq!(ok, vec![Sample { v: 1 }, Sample { v: 2 }]);
        let bad = decode_partition::<Sample>(Path::new("p"), b"{\"v\":\"one\"}");
        assert!(bad.is_err());
    }
}
