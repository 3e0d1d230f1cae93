// src/archive/checksum.rs

//! Entry checksum rewriting for the data archive
//!
//! The apk format calls for per-entry digests over the data archive. The
//! digest scheme is not pinned down yet, so the pipeline runs rewriting
//! through this seam with a no-op implementation until it is.

use crate::error::Result;
use std::path::Path;

/// Rewrites tar entry checksums in a data archive to a target scheme
pub trait ChecksumRewriter {
    fn rewrite(&self, data_archive: &Path) -> Result<()>;
}

/// Leaves the data archive untouched
#[derive(Debug, Default)]
pub struct NoopChecksumRewriter;

impl ChecksumRewriter for NoopChecksumRewriter {
    fn rewrite(&self, _data_archive: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_noop_rewriter_leaves_bytes_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.tar");
        let bytes = vec![0xABu8; 2048];
        fs::write(&path, &bytes).unwrap();

        NoopChecksumRewriter.rewrite(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), bytes);
    }
}
