//! Audio catalog scanning
//!
//! The catalog is a read-only directory tree whose layout encodes sample
//! metadata: `<root>/<genre>/<origin>/<file>.wav`. The origin directory is
//! `training` (human-composed) or `generated` (AI-generated); the origin is
//! hidden from the rater until after submission.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Genre filter value meaning "no filtering"
pub const ANY_GENRE: &str = "Any Genre";

/// Ground-truth origin of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Human,
    Generated,
}

impl Origin {
    /// Map a catalog origin directory name to its origin label
    pub fn from_dir(dir: &str) -> Option<Origin> {
        match dir {
            "training" => Some(Origin::Human),
            "generated" => Some(Origin::Generated),
            _ => None,
        }
    }

    /// Reveal text shown to the rater after submission
    pub fn reveal_text(self) -> &'static str {
        match self {
            Origin::Human => "This drum pattern was human-composed",
            Origin::Generated => "This drum pattern was AI-generated",
        }
    }
}

/// One audio stimulus with the metadata its catalog path encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Path relative to the catalog root, `/`-separated
    pub rel_path: String,
    pub genre: String,
    pub origin: Origin,
}

impl Sample {
    /// Parse a catalog-relative path of the form `genre/origin/file.wav`
    ///
    /// Returns `None` for paths that do not match the expected layout.
    pub fn from_rel_path(rel_path: &str) -> Option<Sample> {
        let mut components = rel_path.split('/');
        let genre = components.next()?;
        let origin = Origin::from_dir(components.next()?)?;
        let file = components.next()?;
        if genre.is_empty() || file.is_empty() || components.next().is_some() {
            return None;
        }
        Some(Sample {
            rel_path: rel_path.to_string(),
            genre: genre.to_string(),
            origin,
        })
    }
}

/// The scanned audio catalog, read-only after startup
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    samples: Vec<Sample>,
    genres: Vec<String>,
}

impl Catalog {
    /// Walk the catalog root and collect all `.wav` samples
    ///
    /// Paths that do not follow the `genre/origin/file.wav` layout are
    /// skipped with a warning rather than trusted blindly.
    pub fn scan(root: &Path) -> Result<Catalog> {
        if !root.is_dir() {
            return Err(Error::Catalog(format!(
                "audio root is not a directory: {}",
                root.display()
            )));
        }

        let mut samples = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| Error::Catalog(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("wav") {
                continue;
            }

            let rel_path = match relative_path(root, entry.path()) {
                Some(rel) => rel,
                None => continue,
            };
            match Sample::from_rel_path(&rel_path) {
                Some(sample) => samples.push(sample),
                None => warn!("Skipping malformed catalog path: {}", rel_path),
            }
        }

        let mut genres: Vec<String> = samples.iter().map(|s| s.genre.clone()).collect();
        genres.sort();
        genres.dedup();

        info!(
            "Scanned audio catalog: {} samples across {} genres",
            samples.len(),
            genres.len()
        );

        Ok(Catalog {
            root: root.to_path_buf(),
            samples,
            genres,
        })
    }

    /// All samples in the catalog
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sorted, de-duplicated genre names
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Absolute path of a sample's audio file
    pub fn audio_path(&self, sample: &Sample) -> PathBuf {
        self.root.join(&sample.rel_path)
    }
}

/// Catalog-relative, `/`-separated form of an absolute sample path
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
