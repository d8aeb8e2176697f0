//! Version catalog
//!
//! A [`Catalog`] is the ordered view of every recognised archive at one point in time.
//! It is rebuilt for every request and never mutated once built. Index 0 is always the
//! newest version.

use std::cmp::Ordering;
use std::path::PathBuf;

use semver::Version;

use crate::config::CatalogSettings;

/// One discovered archive file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedArtifact {
    pub version: Version,
    pub filename: String,
    /// Absolute on-disk path. Server-side only.
    pub location: PathBuf,
    pub download_url: String,
}

impl VersionedArtifact {
    /// Build an artifact from a filename, or `None` if it is not an archive name.
    pub fn from_filename(filename: &str, settings: &CatalogSettings) -> Option<Self> {
        let version = settings.naming.parse_version(filename)?;
        Some(Self {
            version,
            filename: filename.to_string(),
            location: settings.storage_directory.join(filename),
            download_url: settings.download_url(filename),
        })
    }
}

/// Ordered, immutable set of artifacts (descending by version).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    artifacts: Vec<VersionedArtifact>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Filter `filenames` through the naming convention and order the survivors.
    pub fn from_filenames<I, S>(filenames: I, settings: &CatalogSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let artifacts = filenames
            .into_iter()
            .filter_map(|name| VersionedArtifact::from_filename(name.as_ref(), settings))
            .collect();
        Self::from_artifacts(artifacts)
    }

    pub fn from_artifacts(mut artifacts: Vec<VersionedArtifact>) -> Self {
        artifacts.sort_by(newest_first);

        for pair in artifacts.windows(2) {
            if pair[0].version == pair[1].version {
                tracing::warn!(
                    version = %pair[0].version,
                    selected = %pair[0].filename,
                    shadowed = %pair[1].filename,
                    "Multiple archives resolve to the same version"
                );
            }
        }

        Self { artifacts }
    }

    /// Newest artifact, if any.
    pub fn latest(&self) -> Option<&VersionedArtifact> {
        self.artifacts.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionedArtifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VersionedArtifact;
    type IntoIter = std::slice::Iter<'a, VersionedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

/// Descending semver order; equal versions put the lexicographically last filename first.
fn newest_first(a: &VersionedArtifact, b: &VersionedArtifact) -> Ordering {
    b.version
        .cmp(&a.version)
        .then_with(|| b.filename.cmp(&a.filename))
}
