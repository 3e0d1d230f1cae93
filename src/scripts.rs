// src/scripts.rs

//! Lifecycle script installation and rendering
//!
//! Every one of the six hook files is written into the control directory
//! on each build, whether or not the caller supplied a script for it. The
//! package manager expects the full set to be present.

use crate::error::{Error, Result};
use crate::package::{LifecycleHook, Package};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

/// Renders a lifecycle script body from its caller-supplied source
pub trait ScriptRenderer {
    /// Render `source` for `hook`; `None` means the caller supplied no
    /// script for this hook
    fn render(
        &self,
        hook: LifecycleHook,
        source: Option<&str>,
        package: &Package,
    ) -> Result<String>;
}

/// Placeholder-substituting shell renderer
///
/// Replaces `${pkgname}` and `${pkgver}` in the source. Absent sources
/// render to a no-op shell script so every hook file has a runnable body.
#[derive(Debug, Default)]
pub struct ShellRenderer;

/// Body written for hooks the caller supplied no script for
const NOOP_SCRIPT: &str = "#!/bin/sh\nexit 0\n";

impl ScriptRenderer for ShellRenderer {
    fn render(
        &self,
        hook: LifecycleHook,
        source: Option<&str>,
        package: &Package,
    ) -> Result<String> {
        let Some(source) = source else {
            return Ok(NOOP_SCRIPT.to_string());
        };

        let rendered = source
            .replace("${pkgname}", package.stored_name())
            .replace("${pkgver}", &package.full_version());

        // Anything still in placeholder form was not a variable we know.
        if let Some(start) = rendered.find("${") {
            let rest = &rendered[start..];
            let placeholder = match rest.find('}') {
                Some(end) => &rest[..=end],
                None => rest,
            };
            return Err(Error::Template {
                hook: hook.filename(),
                message: format!("unknown placeholder {}", placeholder),
            });
        }

        Ok(rendered)
    }
}

/// Write all six lifecycle hook scripts into `dir`
///
/// Rendering failures are fatal; a hook without a caller-supplied source
/// still gets its file, with the renderer's default body.
pub fn install_scripts(
    dir: &Path,
    package: &mut Package,
    renderer: &dyn ScriptRenderer,
) -> Result<()> {
    debug!("installing control scripts for {}", package.name());

    for hook in LifecycleHook::ALL {
        let source = package.scripts.get(&hook).map(String::as_str);
        let body = renderer.render(hook, source, package)?;

        let script_path = dir.join(hook.filename());
        fs::write(&script_path, body)?;
        set_executable(&script_path)?;
    }

    Ok(())
}

/// Set file as executable
fn set_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}
