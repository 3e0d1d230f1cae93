// src/package.rs

//! Package attributes and lifecycle hook definitions
//!
//! A [`Package`] holds everything the assembler needs: the (normalized)
//! name, version, architecture, the staging directory whose contents become
//! the installed payload, and the caller-supplied lifecycle script sources.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Lifecycle hook points recognized by the apk package manager
///
/// Each hook maps to exactly one fixed filename inside the control archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    PreInstall,
    PostInstall,
    PreDeinstall,
    PostDeinstall,
    PreUpgrade,
    PostUpgrade,
}

impl LifecycleHook {
    /// All hooks, in the order their files are written
    pub const ALL: [LifecycleHook; 6] = [
        Self::PreInstall,
        Self::PostInstall,
        Self::PreDeinstall,
        Self::PostDeinstall,
        Self::PreUpgrade,
        Self::PostUpgrade,
    ];

    /// Fixed filename of this hook inside the control archive
    pub fn filename(&self) -> &'static str {
        match self {
            Self::PreInstall => "pre-install",
            Self::PostInstall => "post-install",
            Self::PreDeinstall => "pre-deinstall",
            Self::PostDeinstall => "post-deinstall",
            Self::PreUpgrade => "pre-upgrade",
            Self::PostUpgrade => "post-upgrade",
        }
    }

    /// Parse from the filename representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pre-install" => Some(Self::PreInstall),
            "post-install" => Some(Self::PostInstall),
            "pre-deinstall" => Some(Self::PreDeinstall),
            "post-deinstall" => Some(Self::PostDeinstall),
            "pre-upgrade" => Some(Self::PreUpgrade),
            "post-upgrade" => Some(Self::PostUpgrade),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename())
    }
}

/// Reasons a raw package name was rewritten during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameWarning {
    UppercaseCharacters,
    Underscores,
    Spaces,
}

impl fmt::Display for NameWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UppercaseCharacters => {
                "apk package names should not have uppercase characters"
            }
            Self::Underscores => "apk package names should not include underscores",
            Self::Spaces => "apk package names should not contain spaces",
        };
        write!(f, "{}", msg)
    }
}

/// Normalize a raw package name for apk
///
/// Applies, in order: lowercase the whole string if it has any uppercase
/// ASCII letter, replace every `_` with `-`, replace every space with `-`.
/// Returns the normalized name and one warning per correction applied.
pub fn normalize_name(raw: &str) -> (String, Vec<NameWarning>) {
    let mut name = raw.to_string();
    let mut warnings = Vec::new();

    if name.chars().any(|c| c.is_ascii_uppercase()) {
        warnings.push(NameWarning::UppercaseCharacters);
        name = name.to_lowercase();
    }

    if name.contains('_') {
        warnings.push(NameWarning::Underscores);
        name = name.replace('_', "-");
    }

    if name.contains(' ') {
        warnings.push(NameWarning::Spaces);
        name = name.replace(' ', "-");
    }

    (name, warnings)
}

/// A package under assembly
///
/// Constructed once per build invocation from caller-supplied attributes.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    /// Upstream version string
    pub version: String,
    /// Package release number, rendered as the `-rN` suffix of `pkgver`
    pub release: u32,
    /// Target architecture
    pub architecture: String,
    /// Install prefix
    pub prefix: PathBuf,
    /// One-line description for the control metadata
    pub description: Option<String>,
    /// Directory whose contents become the installed payload
    pub staging_dir: PathBuf,
    /// Caller-supplied lifecycle script sources
    pub scripts: HashMap<LifecycleHook, String>,
}

impl Package {
    /// Create a package with default release, architecture, and prefix
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            release: 0,
            architecture: "noarch".to_string(),
            prefix: PathBuf::from("/"),
            description: None,
            staging_dir: staging_dir.into(),
            scripts: HashMap::new(),
        }
    }

    /// Package name, normalized for apk
    ///
    /// Normalization permanently rewrites the stored name and logs a
    /// warning per correction; repeated calls return the same value.
    pub fn name(&mut self) -> &str {
        let (normalized, warnings) = normalize_name(&self.name);
        for warning in &warnings {
            warn!("{}", warning);
        }
        self.name = normalized;
        &self.name
    }

    /// The stored name as-is, without triggering normalization
    pub fn stored_name(&self) -> &str {
        &self.name
    }

    /// Canonical version rendering: `<version>-r<release>`
    pub fn full_version(&self) -> String {
        format!("{}-r{}", self.version, self.release)
    }

    /// Default output filename: `<name>-<fullversion>.<arch>.apk`
    pub fn default_filename(&mut self) -> String {
        let full_version = self.full_version();
        let name = self.name().to_string();
        format!("{}-{}.{}.apk", name, full_version, self.architecture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        let (name, warnings) = normalize_name("MyApp");
        assert_eq!(name, "myapp");
        assert_eq!(warnings, vec![NameWarning::UppercaseCharacters]);
    }

    #[test]
    fn test_normalize_replaces_underscores_and_spaces() {
        let (name, warnings) = normalize_name("my_app name");
        assert_eq!(name, "my-app-name");
        assert_eq!(warnings, vec![NameWarning::Underscores, NameWarning::Spaces]);
    }

    #[test]
    fn test_normalize_all_corrections() {
        let (name, warnings) = normalize_name("MyApp_1");
        assert_eq!(name, "myapp-1");
        assert_eq!(
            warnings,
            vec![NameWarning::UppercaseCharacters, NameWarning::Underscores]
        );
    }

    #[test]
    fn test_normalized_name_has_no_forbidden_characters() {
        let samples = ["Weird_Name With Spaces", "UPPER", "a_b c_D", "already-clean"];
        for raw in samples {
            let (name, _) = normalize_name(raw);
            assert!(
                !name.chars().any(|c| c.is_ascii_uppercase() || c == '_' || c == ' '),
                "{:?} normalized to {:?}",
                raw,
                name
            );
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = ["MyApp_1", "plain", "A B_C", ""];
        for raw in samples {
            let (once, _) = normalize_name(raw);
            let (twice, warnings) = normalize_name(&once);
            assert_eq!(once, twice);
            assert!(warnings.is_empty(), "second pass warned for {:?}", raw);
        }
    }

    #[test]
    fn test_package_name_rewrites_stored_name() {
        let mut package = Package::new("MyApp_1", "1.0", "/tmp/staging");
        assert_eq!(package.name(), "myapp-1");
        assert_eq!(package.stored_name(), "myapp-1");
    }

    #[test]
    fn test_full_version_rendering() {
        let mut package = Package::new("app", "1.2.3", "/tmp/staging");
        assert_eq!(package.full_version(), "1.2.3-r0");
        package.release = 4;
        assert_eq!(package.full_version(), "1.2.3-r4");
    }

    #[test]
    fn test_default_filename() {
        let mut package = Package::new("MyApp", "1.0", "/tmp/staging");
        package.architecture = "x86_64".to_string();
        assert_eq!(package.default_filename(), "myapp-1.0-r0.x86_64.apk");
    }

    #[test]
    fn test_hook_filenames_are_fixed() {
        let names: Vec<_> = LifecycleHook::ALL.iter().map(|h| h.filename()).collect();
        assert_eq!(
            names,
            vec![
                "pre-install",
                "post-install",
                "pre-deinstall",
                "post-deinstall",
                "pre-upgrade",
                "post-upgrade"
            ]
        );
    }

    #[test]
    fn test_hook_parse_round_trip() {
        for hook in LifecycleHook::ALL {
            assert_eq!(LifecycleHook::parse(hook.filename()), Some(hook));
        }
        assert_eq!(LifecycleHook::parse("post-remove"), None);
    }
}
