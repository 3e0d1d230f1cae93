// src/pkginfo.rs

//! `.PKGINFO` control metadata writer

use crate::error::Result;
use crate::package::Package;
use std::fs;
use std::path::Path;

/// Filename of the control metadata record
pub const PKGINFO_FILE: &str = ".PKGINFO";

/// Write the `.PKGINFO` record for `package` into `dir`
///
/// One `key = value` line per field. Creates exactly one file; a
/// preexisting record is replaced, never appended to.
pub fn write_pkginfo(dir: &Path, package: &mut Package) -> Result<()> {
    let mut pkginfo = String::new();
    pkginfo.push_str(&format!("pkgname = {}\n", package.name()));
    pkginfo.push_str(&format!("pkgver = {}\n", package.full_version()));
    pkginfo.push_str(&format!("arch = {}\n", package.architecture));
    if let Some(description) = &package.description {
        pkginfo.push_str(&format!("pkgdesc = {}\n", description));
    }

    fs::write(dir.join(PKGINFO_FILE), pkginfo)?;
    Ok(())
}
