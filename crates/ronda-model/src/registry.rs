//! Filesystem model registry.
//!
//! Artifacts live under `<root>/<TICKER>/v<version>-<trained_at>.json`.
//! The registry is a plain value handed to callers; there is no ambient
//! global state.

use crate::artifact::ModelArtifact;
use ronda_traits::{Result, RondaError};
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of versioned model artifacts keyed by ticker.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    root: PathBuf,
}

impl ModelRegistry {
    /// Opens (or designates) a registry rooted at `root`. The directory is
    /// created lazily on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The registry's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ticker_dir(&self, ticker: &str) -> PathBuf {
        self.root.join(ticker.to_uppercase())
    }

    /// Saves an artifact and returns the path it was written to.
    ///
    /// # Errors
    ///
    /// Surfaces directory-creation and write failures.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<PathBuf> {
        artifact.validate()?;
        let dir = self.ticker_dir(&artifact.ticker);
        fs::create_dir_all(&dir)
            .map_err(|e| RondaError::Other(format!("creating {}: {e}", dir.display())))?;
        let path = dir.join(format!(
            "v{}-{}.json",
            artifact.version,
            artifact.trained_at.format("%Y-%m-%d")
        ));
        artifact.save(&path)?;
        Ok(path)
    }

    /// Loads the most recently trained artifact for a ticker.
    ///
    /// Filenames embed the training date in sortable form; the latest
    /// artifact is the one with the greatest date, with the numeric
    /// version breaking ties. Files that do not match the registry naming
    /// scheme are ignored.
    ///
    /// # Errors
    ///
    /// [`RondaError::DataUnavailable`] when the ticker has no stored
    /// artifacts.
    pub fn latest(&self, ticker: &str) -> Result<ModelArtifact> {
        let dir = self.ticker_dir(ticker);
        let entries = fs::read_dir(&dir).map_err(|_| {
            RondaError::DataUnavailable(format!("no stored models for {ticker}"))
        })?;

        let mut newest: Option<((String, u32), PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(key) = artifact_sort_key(&path) else {
                continue;
            };
            if newest.as_ref().map_or(true, |(current, _)| key > *current) {
                newest = Some((key, path));
            }
        }

        match newest {
            Some((_, path)) => ModelArtifact::load(&path),
            None => Err(RondaError::DataUnavailable(format!(
                "no stored models for {ticker}"
            ))),
        }
    }
}

/// Sort key `(trained_at, version)` recovered from a
/// `v<version>-<trained_at>.json` filename. Comparing the version
/// numerically keeps `v10` newer than `v9` on the same date.
fn artifact_sort_key(path: &Path) -> Option<(String, u32)> {
    let stem = path.file_stem()?.to_str()?;
    let (version, trained_at) = stem.strip_prefix('v')?.split_once('-')?;
    Some((trained_at.to_string(), version.parse().ok()?))
}
