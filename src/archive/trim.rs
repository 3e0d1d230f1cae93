// src/archive/trim.rs

//! End-of-archive marker trimming
//!
//! A POSIX tar stream terminates with two consecutive all-zero 512-byte
//! blocks. To splice a control tar in front of a data tar, the control
//! tar's terminator (and whatever padding the archiver wrote after it)
//! has to be cut so the data tar's first entry follows immediately.

use super::BLOCK_SIZE;
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Byte range of the size field within a tar header block
const SIZE_FIELD_OFFSET: usize = 124;
const SIZE_FIELD_LEN: usize = 12;

/// Truncate the tar stream at `path` to remove its end-of-archive marker
///
/// Scans header blocks sequentially until two contiguous zero-size headers
/// are found, then truncates the file immediately before them. A zero-size
/// header that is not followed by a second one (a directory entry, say) is
/// kept: it belongs to the archive. Returns the trimmed length in bytes.
///
/// Fails with [`Error::MalformedArchive`] if the stream ends before the
/// marker is found, and with [`Error::TrimComputation`] if the computed
/// length is not strictly positive.
pub fn trim_end_marker(path: &Path) -> Result<u64> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    let mut header = [0u8; BLOCK_SIZE as usize];
    let mut contiguous_zero_headers = 0u32;
    // Bytes confirmed to precede the terminator; where the next header starts.
    let mut offset: u64 = 0;

    loop {
        match file.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(Error::MalformedArchive {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let size = decode_size_field(&header);

        if size == 0 {
            contiguous_zero_headers += 1;
            if contiguous_zero_headers == 2 {
                break;
            }
            continue;
        }

        // The previous zero header was a false alarm, not the terminator;
        // its block belongs to the archive.
        if contiguous_zero_headers != 0 {
            offset += BLOCK_SIZE;
            contiguous_zero_headers = 0;
        }

        // Content is padded to whole blocks.
        let content_len = size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        offset += BLOCK_SIZE + content_len;
        file.seek(SeekFrom::Current(content_len as i64))?;
    }

    if offset == 0 {
        return Err(Error::TrimComputation {
            path: path.to_path_buf(),
        });
    }

    debug!("truncating {} to {} bytes", path.display(), offset);
    file.set_len(offset)?;
    Ok(offset)
}

/// Decode the ASCII-octal size field of a header block
///
/// The field is octal text, optionally space-padded, terminated by NUL or
/// space. An all-NUL field (as in a zero block) decodes to 0.
fn decode_size_field(header: &[u8; BLOCK_SIZE as usize]) -> u64 {
    let field = &header[SIZE_FIELD_OFFSET..SIZE_FIELD_OFFSET + SIZE_FIELD_LEN];

    let mut value = 0u64;
    let mut seen_digit = false;
    for &byte in field {
        match byte {
            b' ' if !seen_digit => continue,
            b'0'..=b'7' => {
                seen_digit = true;
                value = value * 8 + u64::from(byte - b'0');
            }
            _ => break,
        }
    }
    value
}
