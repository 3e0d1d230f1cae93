// src/archive/concat.rs

//! Byte-exact archive concatenation

use crate::error::Result;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Stream `first` then `second` into `dest`
///
/// Bytes are copied verbatim through a bounded buffer, so memory use is
/// independent of file size. No terminator or framing is added; the second
/// source is expected to carry its own valid end-of-archive marker.
/// Returns the number of bytes written.
pub fn concat_archives(first: &Path, second: &Path, dest: &Path) -> Result<u64> {
    let mut writer = BufWriter::new(File::create(dest)?);

    let mut written = 0u64;
    for source in [first, second] {
        let mut reader = BufReader::new(File::open(source)?);
        written += io::copy(&mut reader, &mut writer)?;
    }

    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn concat_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a");
        let second = temp_dir.path().join("b");
        let dest = temp_dir.path().join("out");
        fs::write(&first, a).unwrap();
        fs::write(&second, b).unwrap();

        let written = concat_archives(&first, &second, &dest).unwrap();
        assert_eq!(written, (a.len() + b.len()) as u64);

        fs::read(&dest).unwrap()
    }

    #[test]
    fn test_concat_is_byte_exact() {
        let a: Vec<u8> = (0u16..600).map(|i| (i % 251) as u8).collect();
        let b = vec![0xFFu8, 0x00, 0x1F, 0x8B];

        let result = concat_bytes(&a, &b);
        assert_eq!(result.len(), a.len() + b.len());
        assert_eq!(&result[..a.len()], &a[..]);
        assert_eq!(&result[a.len()..], &b[..]);
    }

    #[test]
    fn test_concat_empty_sources() {
        assert_eq!(concat_bytes(b"", b""), b"");
        assert_eq!(concat_bytes(b"left", b""), b"left");
        assert_eq!(concat_bytes(b"", b"right"), b"right");
    }

    #[test]
    fn test_concat_binary_with_nulls() {
        let a = vec![0u8; 1024];
        let b = vec![0u8, 1, 0, 2, 0];
        let result = concat_bytes(&a, &b);
        assert_eq!(result.len(), 1029);
        assert_eq!(&result[1024..], &b[..]);
    }
}
