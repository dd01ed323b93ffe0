use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use borsh::BorshSerialize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{Criterion, CriterionStatus, ItemKey, KeyError};

/// A set of extracted criteria serialized in markdown format with YAML
/// frontmatter.
///
/// The layout mirrors what downstream issue templating consumes: a
/// heading carrying the work-item key and title, then one checkbox line
/// per criterion. Multi-line criterion text continues on indented lines
/// and derived test cases appear as indented sub-bullets:
///
/// ```markdown
/// - [ ] AC-1 GIVEN a user
///   WHEN they click submit
///   THEN an error shows
///   - Test: they click submit
///   - Expected: an error shows
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    frontmatter: FrontMatter,
    key: ItemKey,
    title: String,
    criteria: Vec<Criterion>,
}

impl Checklist {
    /// Creates a checklist for a freshly extracted criteria set.
    ///
    /// A new UUID is generated and the extraction time recorded.
    #[must_use]
    pub fn new(key: ItemKey, title: String, criteria: Vec<Criterion>, fingerprint: String) -> Self {
        Self {
            frontmatter: FrontMatter {
                uuid: Uuid::new_v4(),
                extracted: Utc::now(),
                fingerprint,
            },
            key,
            title,
            criteria,
        }
    }

    /// The work-item key this checklist belongs to.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// The work-item title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The criteria, in detection order.
    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// The fingerprint of the source content this was extracted from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.frontmatter.fingerprint
    }

    /// When the extraction ran.
    #[must_use]
    pub const fn extracted(&self) -> DateTime<Utc> {
        self.frontmatter.extracted
    }

    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frontmatter = serde_yaml::to_string(&self.frontmatter).expect("this must never fail");

        let heading = if self.title.is_empty() {
            format!("# {}", self.key)
        } else {
            format!("# {} {}", self.key, self.title)
        };

        let mut body = String::new();
        for criterion in &self.criteria {
            let mut lines = criterion.criterion().lines();
            if let Some(first) = lines.next() {
                body.push_str(&format!(
                    "- [{}] {} {first}\n",
                    criterion.status().symbol(),
                    criterion.id()
                ));
            }
            for continuation in lines {
                body.push_str(&format!("  {continuation}\n"));
            }
            for case in criterion.test_cases() {
                body.push_str(&format!("  - {case}\n"));
            }
        }

        let result = if body.is_empty() {
            format!("---\n{frontmatter}---\n{heading}\n")
        } else {
            format!("---\n{frontmatter}---\n{heading}\n\n{body}")
        };

        writer.write_all(result.as_bytes())
    }

    /// Reads a checklist from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontmatter is missing or malformed, the
    /// heading does not carry a valid work-item key, or a criterion line
    /// cannot be parsed.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self, LoadError> {
        let mut lines = reader.lines();

        // Ensure frontmatter starts correctly
        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))?
            .map_err(LoadError::from)?;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected frontmatter starting with '---'",
            )
            .into());
        }

        // Collect lines until next '---'
        let frontmatter = lines
            .by_ref()
            .map_while(|line| match line {
                Ok(content) if content.trim() == "---" => None,
                Ok(content) => Some(Ok(content)),
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let content = lines.collect::<Result<Vec<_>, _>>()?;

        let front: FrontMatter = serde_yaml::from_str(&frontmatter)?;

        let (key, title, criteria) = parse_content(&content)?;

        Ok(Self {
            frontmatter: front,
            key,
            title,
            criteria,
        })
    }

    /// Writes the checklist to a file path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)
    }

    /// Reads a checklist from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if there is no file at `path`, or
    /// another error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }
}

/// Parses markdown content into key, title, and criteria.
///
/// The key must be the first token in the first heading (after the `#`
/// markers), followed by the title. The criterion lines follow the
/// heading.
fn parse_content(content: &[String]) -> Result<(ItemKey, String, Vec<Criterion>), LoadError> {
    let (heading_idx, line) = content
        .iter()
        .enumerate()
        .find(|(_, line)| line.trim().starts_with('#'))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "No heading found in content - the work-item key must be in the first heading",
            )
        })?;

    let after_hashes = line.trim().trim_start_matches('#').trim();

    let first_token = after_hashes.split_whitespace().next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "No work-item key in heading")
    })?;

    let key = first_token.parse::<ItemKey>()?;

    let title = after_hashes
        .strip_prefix(first_token)
        .unwrap_or("")
        .trim()
        .to_string();

    let criteria = parse_criteria(&content[heading_idx + 1..])?;

    Ok((key, title, criteria))
}

fn parse_criteria(lines: &[String]) -> Result<Vec<Criterion>, LoadError> {
    /// A criterion line under construction.
    struct Pending {
        id: String,
        status: CriterionStatus,
        text: String,
        test_cases: Vec<String>,
    }

    fn finish(pending: Pending, out: &mut Vec<Criterion>) -> Result<(), LoadError> {
        let criterion =
            Criterion::restore(pending.id, &pending.text, pending.status, pending.test_cases)
                .ok_or_else(|| LoadError::Malformed("criterion with empty text".to_string()))?;
        out.push(criterion);
        Ok(())
    }

    let mut out = Vec::new();
    let mut current: Option<Pending> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("- [") {
            if let Some(pending) = current.take() {
                finish(pending, &mut out)?;
            }

            let mut chars = rest.chars();
            let symbol = chars
                .next()
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;
            let status = CriterionStatus::from_symbol(symbol)
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;
            let rest = chars
                .as_str()
                .strip_prefix("] ")
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;
            let (id, text) = rest
                .split_once(' ')
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;

            current = Some(Pending {
                id: id.to_string(),
                status,
                text: text.to_string(),
                test_cases: Vec::new(),
            });
        } else if let Some(rest) = line.strip_prefix("  - ") {
            let pending = current
                .as_mut()
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;
            pending.test_cases.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("  ") {
            let pending = current
                .as_mut()
                .ok_or_else(|| LoadError::Malformed(line.clone()))?;
            pending.text.push('\n');
            pending.text.push_str(rest);
        } else {
            return Err(LoadError::Malformed(line.clone()));
        }
    }

    if let Some(pending) = current.take() {
        finish(pending, &mut out)?;
    }

    Ok(out)
}

/// Calculates the fingerprint of the source content an extraction ran
/// over.
///
/// The fingerprint is a SHA-256 hash of the Borsh-serialized rendered
/// text and explicit criterion list. A checklist whose recorded
/// fingerprint no longer matches its source has drifted and needs
/// re-extraction.
///
/// # Panics
///
/// Panics if borsh serialization fails (which should never happen for
/// this data structure).
#[must_use]
pub fn source_fingerprint(text: &str, explicit: &[String]) -> String {
    #[derive(BorshSerialize)]
    struct FingerprintData<'a> {
        text: &'a str,
        explicit: &'a [String],
    }

    let data = FingerprintData { text, explicit };

    let encoded = borsh::to_vec(&data).expect("this should never fail");
    let hash = Sha256::digest(encoded);

    format!("{hash:x}")
}

/// Errors that can occur when loading a checklist from markdown.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The checklist file was not found.
    #[error("checklist file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The YAML frontmatter could not be parsed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    /// The heading does not carry a valid work-item key.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// A criterion line could not be parsed.
    #[error("malformed checklist line: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(from = "FrontMatterVersion")]
#[serde(into = "FrontMatterVersion")]
struct FrontMatter {
    uuid: Uuid,
    extracted: DateTime<Utc>,
    fingerprint: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum FrontMatterVersion {
    #[serde(rename = "1")]
    V1 {
        uuid: Uuid,
        extracted: DateTime<Utc>,
        fingerprint: String,
    },
}

impl From<FrontMatterVersion> for FrontMatter {
    fn from(version: FrontMatterVersion) -> Self {
        match version {
            FrontMatterVersion::V1 {
                uuid,
                extracted,
                fingerprint,
            } => Self {
                uuid,
                extracted,
                fingerprint,
            },
        }
    }
}

impl From<FrontMatter> for FrontMatterVersion {
    fn from(front_matter: FrontMatter) -> Self {
        let FrontMatter {
            uuid,
            extracted,
            fingerprint,
        } = front_matter;
        Self::V1 {
            uuid,
            extracted,
            fingerprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn test_key() -> ItemKey {
        "PROJ-123".parse().unwrap()
    }

    fn test_frontmatter() -> FrontMatter {
        FrontMatter {
            uuid: Uuid::parse_str("12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53").unwrap(),
            extracted: Utc.with_ymd_and_hms(2026, 8, 7, 7, 15, 0).unwrap(),
            fingerprint: "deadbeef".to_string(),
        }
    }

    fn gwt_criterion() -> Criterion {
        Criterion::with_test_cases(
            "AC-1".to_string(),
            "GIVEN a user\nWHEN they click submit\nTHEN an error shows",
            vec![
                "Test: they click submit".to_string(),
                "Expected: an error shows".to_string(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn markdown_round_trip() {
        let input = r"---
_version: '1'
uuid: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
extracted: 2026-08-07T07:15:00Z
fingerprint: deadbeef
---
# PROJ-123 Login flow

- [ ] AC-1 GIVEN a user
  WHEN they click submit
  THEN an error shows
  - Test: they click submit
  - Expected: an error shows
- [x] PROJ-123-AC-1 Users can log in
";

        let mut reader = Cursor::new(input);
        let checklist = Checklist::read(&mut reader).unwrap();

        assert_eq!(checklist.key(), &test_key());
        assert_eq!(checklist.title(), "Login flow");
        assert_eq!(checklist.criteria().len(), 2);
        assert_eq!(checklist.criteria()[0], gwt_criterion());
        assert_eq!(
            checklist.criteria()[1].status(),
            CriterionStatus::Completed
        );

        let mut bytes: Vec<u8> = vec![];
        checklist.write(&mut bytes).unwrap();

        let actual = String::from_utf8(bytes).unwrap();
        assert_eq!(input, &actual);
    }

    #[test]
    fn empty_criteria_writes_heading_only() {
        let checklist = Checklist {
            frontmatter: test_frontmatter(),
            key: test_key(),
            title: "Nothing found".to_string(),
            criteria: Vec::new(),
        };

        let mut bytes: Vec<u8> = vec![];
        checklist.write(&mut bytes).unwrap();

        let output = String::from_utf8(bytes).unwrap();
        assert!(output.ends_with("# PROJ-123 Nothing found\n"));

        let mut reader = Cursor::new(output);
        let reloaded = Checklist::read(&mut reader).unwrap();
        assert!(reloaded.criteria().is_empty());
    }

    #[test]
    fn key_only_heading() {
        let content = r"---
_version: '1'
uuid: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
extracted: 2026-08-07T07:15:00Z
fingerprint: deadbeef
---
# PROJ-123
";

        let mut reader = Cursor::new(content);
        let checklist = Checklist::read(&mut reader).unwrap();

        assert_eq!(checklist.key(), &test_key());
        assert_eq!(checklist.title(), "");
    }

    #[test]
    fn in_progress_symbol_round_trips() {
        let criterion = Criterion::restore(
            "AC-1".to_string(),
            "Sessions must expire",
            CriterionStatus::InProgress,
            Vec::new(),
        )
        .unwrap();

        let checklist = Checklist {
            frontmatter: test_frontmatter(),
            key: test_key(),
            title: String::new(),
            criteria: vec![criterion],
        };

        let mut bytes: Vec<u8> = vec![];
        checklist.write(&mut bytes).unwrap();
        let output = String::from_utf8(bytes).unwrap();
        assert!(output.contains("- [~] AC-1 Sessions must expire"));

        let mut reader = Cursor::new(output);
        let reloaded = Checklist::read(&mut reader).unwrap();
        assert_eq!(
            reloaded.criteria()[0].status(),
            CriterionStatus::InProgress
        );
    }

    #[test]
    fn invalid_frontmatter_start() {
        let mut reader = Cursor::new("no frontmatter here");
        assert!(Checklist::read(&mut reader).is_err());
    }

    #[test]
    fn invalid_yaml() {
        let content = r"---
invalid: yaml: structure:
extracted: not-a-date
---
# PROJ-123
";

        let mut reader = Cursor::new(content);
        assert!(matches!(
            Checklist::read(&mut reader),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn missing_key_in_heading() {
        let content = r"---
_version: '1'
uuid: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
extracted: 2026-08-07T07:15:00Z
fingerprint: deadbeef
---
# Just a title without a key
";

        let mut reader = Cursor::new(content);
        assert!(matches!(
            Checklist::read(&mut reader),
            Err(LoadError::Key(_))
        ));
    }

    #[test]
    fn unknown_checkbox_symbol_is_malformed() {
        let content = r"---
_version: '1'
uuid: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
extracted: 2026-08-07T07:15:00Z
fingerprint: deadbeef
---
# PROJ-123

- [?] AC-1 Something odd
";

        let mut reader = Cursor::new(content);
        assert!(matches!(
            Checklist::read(&mut reader),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn empty_input() {
        let mut reader = Cursor::new("");
        assert!(Checklist::read(&mut reader).is_err());
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("PROJ-123.md");

        let checklist = Checklist::new(
            test_key(),
            "Login flow".to_string(),
            vec![gwt_criterion()],
            source_fingerprint("some text", &[]),
        );

        checklist.save_to_path(&path).unwrap();

        let loaded = Checklist::load(&path).unwrap();
        assert_eq!(loaded, checklist);
    }

    #[test]
    fn load_nonexistent_file() {
        let tmp = TempDir::new().unwrap();
        let result = Checklist::load(&tmp.path().join("missing.md"));
        assert!(matches!(result, Err(LoadError::NotFound)));
    }

    #[test]
    fn fingerprint_is_stable() {
        let explicit = vec!["one".to_string()];
        assert_eq!(
            source_fingerprint("text", &explicit),
            source_fingerprint("text", &explicit)
        );
    }

    #[test]
    fn text_affects_fingerprint() {
        assert_ne!(source_fingerprint("a", &[]), source_fingerprint("b", &[]));
    }

    #[test]
    fn explicit_list_affects_fingerprint() {
        assert_ne!(
            source_fingerprint("a", &[]),
            source_fingerprint("a", &["one".to_string()])
        );
    }
}
