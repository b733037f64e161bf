//! Code for reading raw post records from a CSV file and resolving their title and content fields.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, Trim};
use std::fs::read_to_string;
use tracing::{debug, info, warn};

const TITLE_FIELDS: [&str; 5] = ["title", "Title", "name", "Name", "Filename"];
const CONTENT_FIELDS: [&str; 5] = ["content", "Content", "body", "Body", "text"];

/// One CSV row, as an ordered list of `(field name, value)` pairs.
#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
pub struct RawRecord {
    fields: Vec<(Box<str>, Box<str>)>,
}

/// The title and content of a record that has content worth publishing.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct ResolvedRecord {
    /// Title with a `.txt` extension removed and underscores turned into spaces.
    /// This may be empty.
    pub title: String,
    pub content: String,
}

/// Where the records for this build came from.
pub enum RecordSource {
    Csv {
        path: Utf8PathBuf,
        records: Vec<RawRecord>,
    },
    Missing,
    Unparseable(anyhow::Error),
}

impl RawRecord {
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Box<str>>,
        V: Into<Box<str>>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the value of the first field with exactly this name, if it is non-empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| &**value)
            .filter(|value| !value.is_empty())
    }

    /// Returns the cleaned title of this record, which may be empty.
    #[must_use]
    pub fn title(&self) -> String {
        TITLE_FIELDS
            .iter()
            .find_map(|name| self.get(name))
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(key, _)| !key.eq_ignore_ascii_case("content"))
                    .map(|(_, value)| &**value)
            })
            .map(clean_title)
            .unwrap_or_default()
    }

    /// Picks out the title and content of this record.
    /// Returns `None` if the content is empty or only whitespace.
    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedRecord> {
        let content = CONTENT_FIELDS
            .iter()
            .find_map(|name| self.get(name))
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(key, value)| !key.eq_ignore_ascii_case("title") && !value.is_empty())
                    .map(|(_, value)| &**value)
            })?;

        if content.trim().is_empty() {
            return None;
        }

        Some(ResolvedRecord {
            title: self.title(),
            content: content.to_owned(),
        })
    }

    fn preview(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| {
                let shown: String = value.chars().take(50).collect();
                let ellipsis = if value.chars().count() > 50 { "..." } else { "" };
                format!("{key}: \"{shown}{ellipsis}\"")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn clean_title(raw: &str) -> String {
    raw.strip_suffix(".txt").unwrap_or(raw).replace('_', " ")
}

/// Parses CSV text with a header row into records.
/// Rows may have fewer or more fields than the header; surrounding whitespace is trimmed from every field.
///
/// # Errors
/// This function returns an error if the header row or any record cannot be parsed.
pub fn read_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("failed to read CSV header row")?
        .clone();

    reader
        .records()
        .enumerate()
        .map(|(index, row)| {
            let row = row.with_context(|| format!("failed to parse CSV record {}", index + 1))?;
            Ok(RawRecord::new(headers.iter().zip(row.iter())))
        })
        .collect()
}

/// Reads records from the first of `candidates` that exists.
#[must_use]
pub fn load_records(candidates: &[Utf8PathBuf]) -> RecordSource {
    let Some(path) = candidates.iter().find(|path| path.is_file()) else {
        return RecordSource::Missing;
    };

    info!("found CSV file at {path}");

    match read_csv_file(path) {
        Ok(records) => {
            info!("parsed {} records from CSV", records.len());
            if let Some(first) = records.first() {
                debug!("first record structure: {}", first.preview());
            }
            RecordSource::Csv {
                path: path.clone(),
                records,
            }
        }
        Err(err) => RecordSource::Unparseable(err),
    }
}

fn read_csv_file(path: &Utf8Path) -> Result<Vec<RawRecord>> {
    let text = read_to_string(path).with_context(|| format!("failed to read CSV file at {path}"))?;

    let preview: String = text.chars().take(200).collect();
    debug!("CSV preview: {preview}...");

    if text.trim().is_empty() {
        warn!("CSV file at {path} is empty");
    }

    read_records(&text).with_context(|| format!("failed to parse CSV file at {path}"))
}

#[cfg(test)]
mod test {
    use super::{load_records, read_records, RawRecord, RecordSource, ResolvedRecord};
    use camino::Utf8PathBuf;
    use std::fs::write;

    fn resolved(title: &str, content: &str) -> Option<ResolvedRecord> {
        Some(ResolvedRecord {
            title: title.into(),
            content: content.into(),
        })
    }

    #[test]
    fn known_field_names() {
        assert_eq!(
            RawRecord::new([("title", "My_Room.txt"), ("content", "# My Room")]).resolve(),
            resolved("My Room", "# My Room")
        );
        assert_eq!(
            RawRecord::new([("Filename", "a_b"), ("Body", "text")]).resolve(),
            resolved("a b", "text")
        );
        // Empty known fields are passed over in favour of later candidates
        assert_eq!(
            RawRecord::new([("title", ""), ("Name", "Named"), ("content", "x")]).resolve(),
            resolved("Named", "x")
        );
    }

    #[test]
    fn positional_fallbacks() {
        // Title falls back to the first field that isn't `content`, even if it is empty
        assert_eq!(
            RawRecord::new([("Content", "body text"), ("heading", "")]).resolve(),
            resolved("", "body text")
        );
        // Content falls back to the first non-empty field that isn't `title`
        assert_eq!(
            RawRecord::new([("Title", "T"), ("notes", ""), ("article", "words")]).resolve(),
            resolved("T", "words")
        );
    }

    #[test]
    fn empty_content_is_dropped() {
        assert!(RawRecord::new([("title", "T"), ("content", "   \n\t ")])
            .resolve()
            .is_none());
        assert!(RawRecord::new([("title", "T")]).resolve().is_none());
        assert!(RawRecord::new(Vec::<(&str, &str)>::new()).resolve().is_none());
    }

    #[test]
    fn only_trailing_txt_is_removed() {
        assert_eq!(
            RawRecord::new([("title", "notes.txt.txt"), ("content", "x")])
                .resolve()
                .map(|record| record.title),
            Some("notes.txt".into())
        );
        assert_eq!(
            RawRecord::new([("title", "a.txt b"), ("content", "x")])
                .resolve()
                .map(|record| record.title),
            Some("a.txt b".into())
        );
    }

    #[test]
    fn csv_parsing() {
        let records = read_records(
            "title,content\n\"My_Room.txt\",\"# My Room\n\nA cozy, warm space.\"\n\n  spaced , padded  \nshort\n",
        )
        .expect("parsing should succeed");

        assert_eq!(
            records,
            vec![
                RawRecord::new([("title", "My_Room.txt"), ("content", "# My Room\n\nA cozy, warm space.")]),
                RawRecord::new([("title", "spaced"), ("content", "padded")]),
                RawRecord::new([("title", "short")]),
            ]
        );
    }

    #[test]
    fn missing_and_found_sources() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("path should be UTF-8");

        let first = root.join("blogposts.csv");
        let second = root.join("public.csv");

        assert!(matches!(
            load_records(&[first.clone(), second.clone()]),
            RecordSource::Missing
        ));

        write(&second, "title,content\nA,B\n").expect("CSV should be written");

        match load_records(&[first, second.clone()]) {
            RecordSource::Csv { path, records } => {
                assert_eq!(path, second);
                assert_eq!(records, vec![RawRecord::new([("title", "A"), ("content", "B")])]);
            }
            _ => panic!("CSV should be found at the second candidate"),
        }
    }

    #[test]
    fn unparseable_source() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("blogposts.csv"))
            .expect("path should be UTF-8");

        write(&path, b"title,content\nA,\xff\xfe\n").expect("CSV should be written");

        assert!(matches!(load_records(&[path]), RecordSource::Unparseable(_)));
    }
}
