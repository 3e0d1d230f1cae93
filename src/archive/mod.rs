// src/archive/mod.rs

//! Tar archive construction and binary stream manipulation
//!
//! An apk is two uncompressed tar streams laid end to end. This module
//! produces the streams (through the external archiver) and performs the
//! byte-level surgery on them: end-of-archive trimming, checksum
//! rewriting, and concatenation.

pub mod checksum;
pub mod concat;
pub mod trim;

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Tar streams are organized in fixed 512-byte blocks
pub const BLOCK_SIZE: u64 = 512;

/// Produces an uncompressed tar stream from a directory tree
///
/// Archive paths are relative to the source directory root (`.` as the
/// archive root). The destination must be a fully-written, closed file by
/// the time this returns; the trimmer truncates it in place afterwards.
pub trait Archiver {
    fn archive(&self, source_dir: &Path, dest: &Path) -> Result<()>;
}

/// Archiver backed by the external `tar` binary
///
/// Ownership metadata is forced to numeric uid/gid 0 so the stream does
/// not vary with the build machine's user database.
#[derive(Debug, Clone)]
pub struct TarArchiver {
    program: PathBuf,
}

impl TarArchiver {
    /// Use a specific archiver binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate the archiver on PATH, preferring GNU tar installed as `gtar`
    pub fn detect() -> Result<Self> {
        let program = which::which("gtar")
            .or_else(|_| which::which("tar"))
            .map_err(|_| {
                Error::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no tar archiver found on PATH",
                ))
            })?;
        Ok(Self { program })
    }
}

impl Default for TarArchiver {
    fn default() -> Self {
        Self::new("tar")
    }
}

impl Archiver for TarArchiver {
    fn archive(&self, source_dir: &Path, dest: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(source_dir)
            .arg("-cf")
            .arg(dest)
            .args(["--owner=0", "--group=0", "--numeric-owner", "."])
            .output()?;

        if !output.status.success() {
            return Err(Error::ExternalProcess {
                program: self.program.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        debug!(
            "archived {} -> {}",
            source_dir.display(),
            dest.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_failing_archiver_reports_external_process() {
        let temp_dir = TempDir::new().unwrap();
        // `false` ignores its arguments and exits 1.
        let archiver = TarArchiver::new("false");

        let result = archiver.archive(temp_dir.path(), &temp_dir.path().join("out.tar"));
        match result {
            Err(Error::ExternalProcess { program, status, .. }) => {
                assert_eq!(program, "false");
                assert_eq!(status.code(), Some(1));
            }
            other => panic!("expected external process error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_archiver_reports_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let archiver = TarArchiver::new("/nonexistent/definitely-not-tar");

        let result = archiver.archive(temp_dir.path(), &temp_dir.path().join("out.tar"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
