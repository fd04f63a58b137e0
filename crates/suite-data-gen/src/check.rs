//! Freshness check
//!
//! Compares what a destination would be written as with what is on disk,
//! without writing anything.

use crate::error::Result;
use crate::test_case::TestCase;
use crate::writer::FileWriter;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// State of a destination file relative to freshly generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// File matches
    Fresh,
    /// File differs
    Stale,
    /// File does not exist
    Missing,
}

impl Freshness {
    /// Whether the file is up to date
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fresh => write!(f, "fresh"),
            Self::Stale => write!(f, "stale"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Hex SHA-256 of `bytes`
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex SHA-256 of the file at `path`
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn file_sha256(path: &Path) -> Result<String> {
    Ok(sha256_hex(&std::fs::read(path)?))
}

/// Compare `cases` for `destination` against the file `writer` would write
///
/// # Errors
///
/// Returns an error if rendering fails or an existing file cannot be read.
pub fn check_destination(
    writer: &FileWriter,
    destination: &str,
    cases: &[TestCase],
) -> Result<Freshness> {
    let expected = sha256_hex(writer.render(cases)?.as_bytes());
    let path = writer.path_for(destination);
    if !path.exists() {
        return Ok(Freshness::Missing);
    }
    if file_sha256(&path)? == expected {
        Ok(Freshness::Fresh)
    } else {
        Ok(Freshness::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::writer::Writer;
    use tempfile::TempDir;

    fn cases() -> Vec<TestCase> {
        vec![TestCase::new("f", vec!["1".to_string()], "F #0 one")]
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_sha256_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(file_sha256(&path).unwrap(), sha256_hex(b"abc"));
    }

    #[test]
    fn test_check_missing_fresh_stale() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::new(dir.path());
        assert_eq!(
            check_destination(&writer, "d", &cases()).unwrap(),
            Freshness::Missing
        );

        writer.write("d", cases()).unwrap();
        assert_eq!(check_destination(&writer, "d", &cases()).unwrap(), Freshness::Fresh);

        let changed = vec![TestCase::new("f", vec!["2".to_string()], "F #0 two")];
        assert_eq!(check_destination(&writer, "d", &changed).unwrap(), Freshness::Stale);
    }

    #[test]
    fn test_check_reports_incomplete_case_before_missing() {
        let dir = TempDir::new().unwrap();
        let writer = FileWriter::new(dir.path());
        let incomplete = vec![TestCase::new("", vec![], "F #0")];
        let err = check_destination(&writer, "d", &incomplete).unwrap_err();
        assert!(matches!(err, Error::IncompleteCase(_)));
    }

    #[test]
    fn test_freshness_display() {
        assert_eq!(Freshness::Fresh.to_string(), "fresh");
        assert_eq!(Freshness::Stale.to_string(), "stale");
        assert_eq!(Freshness::Missing.to_string(), "missing");
        assert!(Freshness::Fresh.is_fresh());
        assert!(!Freshness::Missing.is_fresh());
    }
}
