// src/lib.rs

//! Apkforge
//!
//! Assembles Alpine-style APK packages from a staged filesystem tree,
//! package metadata, and lifecycle hook scripts.
//!
//! # Architecture
//!
//! An apk is two tar streams laid end to end: a control archive carrying
//! `.PKGINFO` and the six lifecycle scripts, with its end-of-archive
//! marker cut off, followed by the data archive carrying the installable
//! payload. The heart of the crate is the binary tar-stream pipeline:
//!
//! - [`archive::trim`]: scan a tar stream for its terminating double zero
//!   block and truncate it there
//! - [`archive::concat`]: byte-exact streaming concatenation
//! - [`assembler`]: the build pipeline tying it all together

pub mod archive;
pub mod assembler;
pub mod compression;
mod error;
pub mod package;
pub mod pkginfo;
pub mod scripts;

pub use archive::checksum::{ChecksumRewriter, NoopChecksumRewriter};
pub use archive::{Archiver, TarArchiver};
pub use assembler::{AssemblerConfig, AssemblyState, PackageAssembler};
pub use compression::CompressionFormat;
pub use error::{Error, Result};
pub use package::{normalize_name, LifecycleHook, NameWarning, Package};
pub use scripts::{ScriptRenderer, ShellRenderer};
