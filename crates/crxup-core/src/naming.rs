//! Archive naming convention.
//!
//! An archive is recognised only when its filename is exactly
//! `<prefix><major>.<minor>.<patch><suffix>`, e.g. `crx-pp-extension-3.0.1.zip`.
//! Every other name is invisible to the catalog; parsing is a filter, never an error.

use crate::error::AppError;
use regex::Regex;
use semver::Version;

pub const DEFAULT_ARCHIVE_PREFIX: &str = "crx-pp-extension-";
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".zip";

/// Compiled filename convention for extension archives.
#[derive(Clone, Debug)]
pub struct ArchiveNaming {
    prefix: String,
    suffix: String,
    pattern: Regex,
}

impl ArchiveNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self, AppError> {
        let prefix = prefix.into();
        let suffix = suffix.into();

        if prefix.is_empty() || suffix.is_empty() {
            return Err(AppError::Config(
                "Archive prefix and suffix must not be empty".to_string(),
            ));
        }
        // Upload temporaries are dot-prefixed and must never match.
        if prefix.starts_with('.') {
            return Err(AppError::Config(format!(
                "Archive prefix must not start with '.': {}",
                prefix
            )));
        }
        // Archives live flat in the storage directory.
        for part in [&prefix, &suffix] {
            if part.contains(|c: char| matches!(c, '/' | '\\' | '\0')) || part.contains("..") {
                return Err(AppError::Config(format!(
                    "Archive prefix and suffix must not contain path separators, '..' or NUL: {:?}",
                    part
                )));
            }
        }

        let pattern = Regex::new(&format!(
            r"^{}([0-9]+)\.([0-9]+)\.([0-9]+){}$",
            regex::escape(&prefix),
            regex::escape(&suffix)
        ))
        .map_err(|e| AppError::Config(format!("Invalid archive naming pattern: {}", e)))?;

        Ok(Self {
            prefix,
            suffix,
            pattern,
        })
    }

    /// Naming used by the published extension builds (`crx-pp-extension-X.Y.Z.zip`).
    pub fn standard() -> Result<Self, AppError> {
        Self::new(DEFAULT_ARCHIVE_PREFIX, DEFAULT_ARCHIVE_SUFFIX)
    }

    /// Extract the version embedded in `filename`.
    ///
    /// Returns `None` unless the whole name matches the convention. Components that do not
    /// fit in a `u64` also yield `None`, so a partial version is never produced.
    pub fn parse_version(&self, filename: &str) -> Option<Version> {
        let captures = self.pattern.captures(filename)?;
        let component = |index: usize| captures.get(index)?.as_str().parse::<u64>().ok();
        Some(Version::new(component(1)?, component(2)?, component(3)?))
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.parse_version(filename).is_some()
    }

    /// Human-readable form of the convention, for error messages.
    pub fn describe(&self) -> String {
        format!("{}X.Y.Z{}", self.prefix, self.suffix)
    }
}
