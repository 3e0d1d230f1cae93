// src/compression.rs

//! Optional compression post-step for the assembled package
//!
//! The concatenated control+data stream can be stored raw or gzipped as a
//! whole. Alpine's repositories conventionally carry gzipped packages, but
//! the raw stream is equally valid for local installs, so the choice is
//! the caller's.

use crate::error::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Compression applied to the concatenated package stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionFormat {
    /// Raw concatenated tar stream
    #[default]
    None,
    /// Gzip (.gz)
    Gzip,
}

impl CompressionFormat {
    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "gz" | "gzip" => Some(Self::Gzip),
            _ => None,
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compress `source` into `dest` using `format`
///
/// `CompressionFormat::None` copies the bytes through unchanged.
pub fn compress_file(source: &Path, dest: &Path, format: CompressionFormat) -> Result<()> {
    let mut reader = BufReader::new(File::open(source)?);

    match format {
        CompressionFormat::None => {
            let mut writer = BufWriter::new(File::create(dest)?);
            io::copy(&mut reader, &mut writer)?;
            writer.flush()?;
        }
        CompressionFormat::Gzip => {
            let writer = BufWriter::new(File::create(dest)?);
            let mut encoder = GzEncoder::new(writer, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_parse() {
        assert_eq!(CompressionFormat::parse("none"), Some(CompressionFormat::None));
        assert_eq!(CompressionFormat::parse("gz"), Some(CompressionFormat::Gzip));
        assert_eq!(CompressionFormat::parse("gzip"), Some(CompressionFormat::Gzip));
        assert_eq!(CompressionFormat::parse("zstd"), None);
    }

    #[test]
    fn test_none_copies_through() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in");
        let dest = temp_dir.path().join("out");
        let bytes: Vec<u8> = (0u16..2000).map(|i| (i % 256) as u8).collect();
        fs::write(&source, &bytes).unwrap();

        compress_file(&source, &dest, CompressionFormat::None).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_gzip_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in");
        let dest = temp_dir.path().join("out.gz");
        let bytes = b"two tars walk into a stream".repeat(64);
        fs::write(&source, &bytes).unwrap();

        compress_file(&source, &dest, CompressionFormat::Gzip).unwrap();

        let compressed = fs::read(&dest).unwrap();
        // Gzip magic: 1f 8b
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoder = flate2::read::GzDecoder::new(&compressed[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert_eq!(decompressed, bytes);
    }
}
