//! A filesystem backed workspace of work-item payloads.
//!
//! A workspace is a directory of `*.json` work-item exports. Each
//! payload is extracted independently, so the batch runs one document
//! per worker in parallel.

use std::{
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{Config, WorkItem},
    extract::{ExtractionInput, Pipeline},
    render,
    storage::checklist::{Checklist, LoadError, source_fingerprint},
};

/// The directory holding workspace metadata.
pub const META_DIR: &str = ".crit";

/// A filesystem backed workspace of work-item payloads.
#[derive(Debug)]
pub struct Workspace {
    /// The root of the directory payloads are stored in.
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens a workspace at the given path.
    ///
    /// The configuration is read from `.crit/config.toml`; a missing or
    /// unreadable file falls back to defaults.
    #[must_use]
    pub fn open(root: PathBuf) -> Self {
        let config_path = root.join(META_DIR).join("config.toml");
        let config = Config::load(&config_path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        });

        Self { root, config }
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The workspace configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All work-item payload files in the workspace, sorted for stable
    /// output.
    #[must_use]
    pub fn payload_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| {
                // Skip the .crit directory (used for configuration and
                // other metadata)
                !entry.path().components().any(|c| c.as_os_str() == META_DIR)
            })
            .filter(|entry| entry.path().extension() == Some(OsStr::new("json")))
            .map(walkdir::DirEntry::into_path)
            .collect();
        paths.sort();
        paths
    }

    /// Finds the stored checklist for a work-item key, anywhere in the
    /// workspace.
    #[must_use]
    pub fn find_checklist(&self, key: &crate::domain::ItemKey) -> Option<PathBuf> {
        let file_name = format!("{key}.md");
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| {
                entry.path().components().all(|c| c.as_os_str() != META_DIR)
                    && entry.path().file_name() == Some(OsStr::new(&file_name))
            })
            .map(walkdir::DirEntry::into_path)
    }

    /// Extracts criteria from a single payload file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// work-item payload. Extraction itself cannot fail: a payload with
    /// nothing to extract yields a checklist with no criteria.
    pub fn extract_item(&self, path: &Path) -> Result<Extraction, ExtractionError> {
        let content = std::fs::read_to_string(path)?;
        let item: WorkItem = serde_json::from_str(&content)?;

        let pipeline = Pipeline::from_config(&self.config);
        let text = item.description().map_or_else(String::new, |root| {
            render::render_with_depth(root, self.config.max_render_depth())
        });

        let fingerprint = source_fingerprint(&text, item.criteria());
        let input = ExtractionInput::new(text, item.key().clone())
            .with_explicit(item.criteria().to_vec());
        let criteria = pipeline.run(&input);

        if criteria.is_empty() {
            tracing::info!("no acceptance criteria could be derived for {}", item.key());
        }

        let checklist = Checklist::new(
            item.key().clone(),
            item.title().to_string(),
            criteria,
            fingerprint,
        );

        Ok(Extraction {
            source: path.to_path_buf(),
            checklist,
        })
    }

    /// Extracts criteria from every payload in the workspace, one
    /// document per worker.
    ///
    /// This method does *not* fail fast: unreadable or malformed
    /// payloads are collected alongside the successful extractions so
    /// the caller can report them without losing the rest of the batch.
    #[must_use]
    pub fn extract_all(&self) -> (Vec<Extraction>, Vec<(PathBuf, ExtractionError)>) {
        let paths = self.payload_paths();

        let (extractions, failures): (Vec<_>, Vec<_>) = paths
            .par_iter()
            .map(|path| {
                self.extract_item(path)
                    .map_err(|e| (path.clone(), e))
            })
            .partition(Result::is_ok);

        let extractions = extractions.into_iter().map(Result::unwrap).collect();
        let failures = failures.into_iter().map(Result::unwrap_err).collect();

        (extractions, failures)
    }

    /// Compares an extraction against the checklist currently on disk.
    #[must_use]
    pub fn freshness(&self, extraction: &Extraction) -> Freshness {
        match Checklist::load(&extraction.target()) {
            Ok(existing) if existing.fingerprint() == extraction.checklist.fingerprint() => {
                Freshness::Current
            }
            Ok(_) => Freshness::Drifted,
            Err(LoadError::NotFound) => Freshness::New,
            Err(e) => {
                tracing::debug!(
                    "existing checklist at {} is unreadable ({e}), treating as drifted",
                    extraction.target().display()
                );
                Freshness::Drifted
            }
        }
    }

    /// Writes each extraction's checklist next to its payload.
    ///
    /// This method does *not* fail fast. That is, it will attempt to
    /// write all the checklists before returning the error.
    ///
    /// # Errors
    ///
    /// Returns an error listing every checklist that could not be saved.
    pub fn write_checklists(
        &self,
        extractions: &[Extraction],
    ) -> Result<Vec<PathBuf>, WriteChecklistsError> {
        let mut written = Vec::new();
        let mut failures = Vec::new();

        for extraction in extractions {
            let target = extraction.target();
            match extraction.checklist.save_to_path(&target) {
                Ok(()) => written.push(target),
                Err(e) => failures.push((target, e)),
            }
        }

        NonEmpty::from_vec(failures)
            .map_or(Ok(written), |failures| Err(WriteChecklistsError { failures }))
    }
}

/// The result of extracting one payload.
#[derive(Debug)]
pub struct Extraction {
    source: PathBuf,
    checklist: Checklist,
}

impl Extraction {
    /// The payload file this was extracted from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The extracted checklist.
    #[must_use]
    pub const fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Where the checklist is stored: next to the payload, with an `.md`
    /// extension.
    #[must_use]
    pub fn target(&self) -> PathBuf {
        self.source.with_extension("md")
    }
}

/// How an extraction relates to the checklist already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No checklist exists yet.
    New,
    /// The stored checklist matches the current source content.
    Current,
    /// The source content changed since the checklist was written.
    Drifted,
}

/// Errors that can occur when extracting a single payload.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The payload file could not be read.
    #[error("failed to read payload: {0}")]
    Io(#[from] io::Error),
    /// The payload is not a valid work-item export.
    #[error("invalid work-item payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Error returned when some checklists could not be written.
#[derive(Debug, thiserror::Error)]
pub struct WriteChecklistsError {
    failures: NonEmpty<(PathBuf, io::Error)>,
}

impl fmt::Display for WriteChecklistsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "failed to write checklists: ")?;

        let total = self.failures.len();

        let displayed_paths: Vec<String> = self
            .failures
            .iter()
            .take(MAX_DISPLAY)
            .map(|(p, _e)| p.display().to_string())
            .collect();

        let msg = displayed_paths.join(", ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}
