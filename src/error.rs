// src/error.rs

//! Error types for the apkforge crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a package
#[derive(Error, Debug)]
pub enum Error {
    /// Feature is intentionally unimplemented
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// End-of-archive marker not found before end of file
    #[error("malformed tar stream {}: eof before end-of-archive marker", path.display())]
    MalformedArchive {
        /// Archive being scanned
        path: PathBuf,
    },

    /// Computed truncation length was not strictly positive
    #[error("unable to trim control tar {}", path.display())]
    TrimComputation {
        /// Archive being trimmed
        path: PathBuf,
    },

    /// External archiver exited with a nonzero status
    #[error("{program} failed ({status}): {stderr}")]
    ExternalProcess {
        /// Program that was invoked
        program: String,
        /// Exit status reported by the process
        status: std::process::ExitStatus,
        /// Captured diagnostic output
        stderr: String,
    },

    /// Script template rendering failed
    #[error("failed to render {hook} script: {message}")]
    Template {
        /// Hook whose script was being rendered
        hook: &'static str,
        /// What went wrong
        message: String,
    },

    /// IO error on a build resource
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
