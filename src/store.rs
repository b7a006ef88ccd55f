use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Ranked result links per query, in query order.
///
/// Serialized as a JSON object whose key order is the query order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    entries: IndexMap<String, Vec<String>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<&[String]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    /// Record the results for `query`. A query already in the store keeps its
    /// position and has its list replaced.
    pub fn insert(&mut self, query: impl Into<String>, results: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(query.into(), results)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(q, r)| (q.as_str(), r.as_slice()))
    }

    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Load a store, returning `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(action = "load", component = "result_store", file_path = ?path, "Result store not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read result store {:?}", path))
            }
        };

        info!(action = "load", component = "result_store", file_path = ?path, "Reading result store");
        let store: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid result store {:?}", path))?;
        info!(action = "loaded", component = "result_store", query_count = store.len(), file_path = ?path, "Loaded result store");
        Ok(Some(store))
    }

    /// Load a store, treating a missing file as an empty store.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    /// Write the whole store to `path`.
    ///
    /// The JSON goes to a temporary file in the destination directory which is
    /// then renamed over `path`, so readers see either the old or the new
    /// store and never a partial one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))?;

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        temp.write_all(self.to_json()?.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace result store {:?}", path))?;

        info!(action = "save", component = "result_store", query_count = self.len(), file_path = ?path, "Saved result store");
        Ok(())
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(String::from_utf8(buf)?)
    }
}

impl FromIterator<(String, Vec<String>)> for ResultStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Read the query list, one query per line, keeping lines `start..end`.
///
/// `start` and `end` are 0-based line positions in the file, blank lines
/// included. The range is clamped to the file's length, and an `end` at or
/// before `start` selects nothing. Selected lines are trimmed and blank ones
/// dropped.
pub fn load_queries(path: &Path, start: usize, end: Option<usize>) -> Result<Vec<String>> {
    info!(action = "load", component = "query_file", file_path = ?path, "Reading queries");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file {:?}", path))?;

    let lines: Vec<&str> = content.lines().collect();
    let end = end.unwrap_or(lines.len()).min(lines.len());
    let start = start.min(end);

    let selected: Vec<String> = lines[start..end]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    info!(
        action = "loaded",
        component = "query_file",
        total_lines = lines.len(),
        selected_queries = selected.len(),
        range_start = start,
        range_end = end,
        "Loaded queries"
    );
    Ok(selected)
}
