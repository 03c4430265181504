//! Filesystem line provider.
//!
//! The engine treats line data as already resident in memory; this is the
//! one place in the viewer that touches the disk on load.

use std::fs;

use sift_core::source::{LineSource, SourceError, SourcePayload};

/// Reads whole files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLineSource;

impl LineSource for FsLineSource {
    fn fetch(&self, path: &str) -> Result<SourcePayload, SourceError> {
        if path.trim().is_empty() {
            return Err(SourceError::MissingPath);
        }
        let metadata = fs::metadata(path).map_err(|err| SourceError::Read {
            path: path.to_owned(),
            detail: err.to_string(),
        })?;
        if metadata.is_dir() {
            return Err(SourceError::Read {
                path: path.to_owned(),
                detail: "is a directory".to_owned(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|err| SourceError::Read {
            path: path.to_owned(),
            detail: err.to_string(),
        })?;
        Ok(SourcePayload {
            lines: contents.lines().map(str::to_owned).collect(),
            byte_size: metadata.len(),
            structured_hint: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn reads_lines_and_byte_size() {
        let Some(mut file) = tempfile::NamedTempFile::new().ok() else {
            panic!("temp file unavailable");
        };
        let _ = writeln!(file, "first line");
        let _ = writeln!(file, r#"{{"level":"info"}}"#);
        let path = file.path().to_string_lossy().into_owned();

        let payload = FsLineSource.fetch(&path).unwrap_or_default();
        assert_eq!(payload.lines.len(), 2);
        assert_eq!(payload.lines[0], "first line");
        assert!(payload.byte_size > 0);
        assert_eq!(payload.structured_hint, None);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            FsLineSource.fetch("  "),
            Err(SourceError::MissingPath)
        ));
    }

    #[test]
    fn missing_file_maps_to_a_read_error() {
        let err = FsLineSource.fetch("/nonexistent/sift-test.log").err();
        assert!(matches!(err, Some(SourceError::Read { .. })));
    }

    #[test]
    fn directories_are_rejected() {
        let Some(dir) = tempfile::tempdir().ok() else {
            panic!("temp dir unavailable");
        };
        let path = dir.path().to_string_lossy().into_owned();
        let err = FsLineSource.fetch(&path).err();
        match err {
            Some(SourceError::Read { detail, .. }) => assert!(detail.contains("directory")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
