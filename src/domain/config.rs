use std::path::Path;

use serde::{Deserialize, Serialize};

/// The default modal cue words recognised by the heuristic line scan.
pub const DEFAULT_CUE_WORDS: [&str; 6] = ["should", "must", "will", "shall", "can", "able to"];

/// Configuration for criteria extraction.
///
/// This struct holds the tunable parts of the extraction rules: the
/// modal cue words, the noise guard on line length, and the renderer's
/// recursion cap. A fresh rule set is built from the configuration for
/// every pipeline run, so there is no ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Modal cue words that mark a free-text line as a candidate
    /// criterion.
    cue_words: Vec<String>,

    /// Lines whose trimmed length is at or below this threshold are
    /// rejected by the heuristic scan.
    min_line_len: usize,

    /// Maximum recursion depth when rendering a document tree.
    ///
    /// Guards against pathological nesting in an unverified external
    /// payload.
    max_render_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cue_words: default_cue_words(),
            min_line_len: default_min_line_len(),
            max_render_depth: default_max_render_depth(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML
    /// or if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the modal cue words.
    #[must_use]
    pub fn cue_words(&self) -> &[String] {
        &self.cue_words
    }

    /// Returns the minimum accepted trimmed line length.
    #[must_use]
    pub const fn min_line_len(&self) -> usize {
        self.min_line_len
    }

    /// Returns the renderer recursion cap.
    #[must_use]
    pub const fn max_render_depth(&self) -> usize {
        self.max_render_depth
    }
}

fn default_cue_words() -> Vec<String> {
    DEFAULT_CUE_WORDS.iter().map(ToString::to_string).collect()
}

const fn default_min_line_len() -> usize {
    10
}

const fn default_max_render_depth() -> usize {
    64
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_cue_words")]
        cue_words: Vec<String>,

        #[serde(default = "default_min_line_len")]
        min_line_len: usize,

        #[serde(default = "default_max_render_depth")]
        max_render_depth: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                cue_words,
                min_line_len,
                max_render_depth,
            } => Self {
                cue_words,
                min_line_len,
                max_render_depth,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            cue_words: config.cue_words,
            min_line_len: config.min_line_len,
            max_render_depth: config.max_render_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ncue_words = [\"should\", \"ought to\"]\nmin_line_len = 5\nmax_render_depth = 16\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(
            config.cue_words(),
            &["should".to_string(), "ought to".to_string()]
        );
        assert_eq!(config.min_line_len(), 5);
        assert_eq!(config.max_render_depth(), 16);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmin_line_len = \"ten\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising a version-only file returns the default
        // configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
