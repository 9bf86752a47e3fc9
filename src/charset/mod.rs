//! Character set extraction
//!
//! Collects every distinct character appearing in the source tables,
//! plus a fixed baseline (A-Z, 0-9, full-width colon), and persists the
//! result as one line of code-point-sorted characters with no separators.

pub mod table;

use crate::constants::BASELINE_CHARS;
use crate::error::{GlyphsheetError, Result};
use crate::utils::write_atomic;
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Sorted, duplicate-free set of characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    chars: BTreeSet<char>,
}

impl CharacterSet {
    /// Set containing only the baseline characters
    pub fn with_baseline() -> Self {
        Self {
            chars: BASELINE_CHARS.chars().collect(),
        }
    }

    /// Add every character of `text`
    pub fn insert_text(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }

    /// Add every character of every cell of a parsed table
    pub fn insert_table(&mut self, text: &str) {
        for row in table::parse_rows(text) {
            for cell in &row {
                self.insert_text(cell);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Characters in ascending code point order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Artifact form: all characters concatenated, no delimiter
    pub fn to_artifact_string(&self) -> String {
        self.iter().collect()
    }
}

#[cfg(test)]
impl CharacterSet {
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }
}

/// Find source tables directly inside `dir` with the given extension, sorted by path
///
/// A missing directory is reported the same way as an empty one.
pub fn discover_tables(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let not_found = || GlyphsheetError::InputNotFound {
        dir: dir.to_path_buf(),
        extension: extension.to_string(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(GlyphsheetError::io(dir, e)),
    };

    let mut tables: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().map_or(false, |ext| ext == extension))
        .collect();
    tables.sort();

    if tables.is_empty() {
        return Err(not_found());
    }

    debug!("Found {} table(s) in {}", tables.len(), dir.display());
    Ok(tables)
}

/// Build the character set from the given tables
pub fn extract_from_tables(tables: &[PathBuf]) -> Result<CharacterSet> {
    let mut set = CharacterSet::with_baseline();

    for path in tables {
        let text = std::fs::read_to_string(path).map_err(|e| GlyphsheetError::io(path, e))?;
        let before = set.len();
        set.insert_table(&text);
        debug!(
            "{}: {} new character(s)",
            path.display(),
            set.len() - before
        );
    }

    Ok(set)
}

/// Write the set to `path`, overwriting any prior content
pub fn write_artifact(set: &CharacterSet, path: &Path) -> Result<()> {
    write_atomic(path, set.to_artifact_string().as_bytes())
}

/// Read a character list artifact, dropping line breaks
///
/// Order is kept as written; no deduplication happens here.
pub fn read_char_list(path: &Path) -> Result<Vec<char>> {
    let content = std::fs::read_to_string(path).map_err(|e| GlyphsheetError::io(path, e))?;
    Ok(content.chars().filter(|&c| c != '\n' && c != '\r').collect())
}

/// Discover, extract and write in one step
///
/// Nothing is written when no tables are found or any table fails to read.
pub fn run_extraction(dir: &Path, extension: &str, output: &Path) -> Result<CharacterSet> {
    let tables = discover_tables(dir, extension)?;
    info!("Reading {} table(s) from {}", tables.len(), dir.display());

    let set = extract_from_tables(&tables)?;
    write_artifact(&set, output)?;

    info!(
        "Extracted {} unique characters -> {}",
        set.len(),
        output.display()
    );
    Ok(set)
}
