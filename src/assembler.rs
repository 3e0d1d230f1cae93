// src/assembler.rs

//! Package assembly pipeline
//!
//! Drives one build end to end: data tar from the staging tree, control
//! tar from a scoped metadata directory, end-of-archive trimming, checksum
//! rewriting, concatenation, and the optional compression post-step. Any
//! step failure aborts the pipeline; nothing is promoted to the
//! destination path on failure.

use crate::archive::checksum::{ChecksumRewriter, NoopChecksumRewriter};
use crate::archive::concat::concat_archives;
use crate::archive::trim::trim_end_marker;
use crate::archive::Archiver;
use crate::compression::{compress_file, CompressionFormat};
use crate::error::{Error, Result};
use crate::package::Package;
use crate::pkginfo::write_pkginfo;
use crate::scripts::{install_scripts, ScriptRenderer, ShellRenderer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Pipeline progress, tracked for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Init,
    DataArchiveBuilt,
    MetadataPrepared,
    MetadataArchiveBuilt,
    MetadataTrimmed,
    DataHashed,
    Concatenated,
    Failed,
}

/// Assembly options beyond the package attributes
#[derive(Debug, Default)]
pub struct AssemblerConfig {
    /// Compression applied to the concatenated stream
    pub compression: CompressionFormat,
    /// On failure, copy the scoped build directory here for inspection
    pub retain_build_dir: Option<PathBuf>,
}

/// Assembles one package per invocation
pub struct PackageAssembler {
    archiver: Box<dyn Archiver>,
    renderer: Box<dyn ScriptRenderer>,
    rewriter: Box<dyn ChecksumRewriter>,
    config: AssemblerConfig,
    state: AssemblyState,
}

impl PackageAssembler {
    /// Create an assembler with the default renderer and checksum rewriter
    pub fn new(archiver: impl Archiver + 'static) -> Self {
        Self {
            archiver: Box::new(archiver),
            renderer: Box::new(ShellRenderer),
            rewriter: Box::new(NoopChecksumRewriter),
            config: AssemblerConfig::default(),
            state: AssemblyState::Init,
        }
    }

    /// Set assembly options
    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the script renderer
    pub fn with_renderer(mut self, renderer: impl ScriptRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Replace the checksum rewriter
    pub fn with_checksum_rewriter(mut self, rewriter: impl ChecksumRewriter + 'static) -> Self {
        self.rewriter = Box::new(rewriter);
        self
    }

    /// Current pipeline state
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    fn set_state(&mut self, state: AssemblyState) {
        debug!("assembly state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Assemble `package` into the file at `output_path`
    ///
    /// Returns the size of the written package in bytes. On failure the
    /// destination path is left untouched and, if configured, the scoped
    /// build directory is copied out for inspection.
    pub fn assemble(&mut self, package: &mut Package, output_path: &Path) -> Result<u64> {
        self.set_state(AssemblyState::Init);
        let build_dir = TempDir::new()?;

        match self.run_pipeline(package, output_path, build_dir.path()) {
            Ok(size) => Ok(size),
            Err(err) => {
                self.set_state(AssemblyState::Failed);
                if let Some(dest) = self.config.retain_build_dir.clone() {
                    if let Err(copy_err) = retain_build_dir(build_dir.path(), &dest) {
                        warn!("failed to retain build directory: {}", copy_err);
                    } else {
                        info!("build directory retained at {}", dest.display());
                    }
                }
                Err(err)
            }
        }
    }

    /// Extracting an existing package is intentionally unsupported
    pub fn extract(&self, _package_path: &Path, _dest: &Path) -> Result<()> {
        Err(Error::UnsupportedOperation("apk extraction"))
    }

    fn run_pipeline(
        &mut self,
        package: &mut Package,
        output_path: &Path,
        build_dir: &Path,
    ) -> Result<u64> {
        let data_tar = build_dir.join("data.tar");
        let control_tar = build_dir.join("control.tar");

        // Data archive from the staging tree.
        self.archiver.archive(&package.staging_dir, &data_tar)?;
        self.set_state(AssemblyState::DataArchiveBuilt);

        // The control directory is scoped: created, populated, tarred, and
        // deleted whether or not the archive build succeeds.
        {
            let control_dir = tempfile::Builder::new()
                .prefix("control")
                .tempdir_in(build_dir)?;
            write_pkginfo(control_dir.path(), package)?;
            install_scripts(control_dir.path(), package, self.renderer.as_ref())?;
            self.set_state(AssemblyState::MetadataPrepared);
            self.archiver.archive(control_dir.path(), &control_tar)?;
        }
        self.set_state(AssemblyState::MetadataArchiveBuilt);

        // The archiver process has exited and its output is closed; the
        // control tar is safe to truncate in place.
        trim_end_marker(&control_tar)?;
        self.set_state(AssemblyState::MetadataTrimmed);

        self.rewriter.rewrite(&data_tar)?;
        self.set_state(AssemblyState::DataHashed);

        let scratch = build_dir.join("package.apk");
        concat_archives(&control_tar, &data_tar, &scratch)?;

        let finished = match self.config.compression {
            CompressionFormat::None => scratch,
            CompressionFormat::Gzip => {
                let compressed = build_dir.join("package.apk.gz");
                compress_file(&scratch, &compressed, CompressionFormat::Gzip)?;
                compressed
            }
        };

        promote(&finished, output_path)?;
        self.set_state(AssemblyState::Concatenated);

        let size = fs::metadata(output_path)?.len();
        info!(
            "assembled {} ({} bytes, compression {})",
            output_path.display(),
            size,
            self.config.compression
        );
        Ok(size)
    }
}

/// Move the finished package into place
///
/// Rename when possible; falls back to copying to a `.partial` sibling and
/// renaming that, so the destination path never holds a half-written file.
fn promote(finished: &Path, dest: &Path) -> Result<()> {
    if fs::rename(finished, dest).is_ok() {
        return Ok(());
    }

    let partial_name = dest
        .file_name()
        .map(|name| {
            let mut partial = name.to_os_string();
            partial.push(".partial");
            partial
        })
        .ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path {} has no filename", dest.display()),
            ))
        })?;
    let partial = dest.with_file_name(partial_name);

    if let Err(err) = fs::copy(finished, &partial).and_then(|_| fs::rename(&partial, dest)) {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(())
}

/// Copy the scoped build directory to a caller-controlled destination
fn retain_build_dir(build_dir: &Path, dest: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(build_dir) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(build_dir)
            .map_err(|e| Error::Io(io::Error::other(e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
