//! Core data models shared by the loader, store, and commands.

use std::fmt;
use std::path::PathBuf;

/// Column names expected in every data file's header row.
pub const FIELDS: [&str; 6] = [
    "name",
    "meaning",
    "birth_flower",
    "name_origin",
    "meaning_origin",
    "trivia",
];

/// One normalized row of the flower dataset.
///
/// `name` is the primary key. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowerRecord {
    pub name: String,
    pub meaning: String,
    pub birth_flower: String,
    pub name_origin: String,
    pub meaning_origin: String,
    pub trivia: String,
}

impl FlowerRecord {
    /// All field values, in [`FIELDS`] order.
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.meaning,
            &self.birth_flower,
            &self.name_origin,
            &self.meaning_origin,
            &self.trivia,
        ]
    }

    /// Builds a record from a column lookup; missing columns become empty.
    pub(crate) fn from_columns<'a>(mut get: impl FnMut(&str) -> Option<&'a str>) -> Self {
        let mut take = |field: &str| get(field).unwrap_or_default().to_string();
        Self {
            name: take("name"),
            meaning: take("meaning"),
            birth_flower: take("birth_flower"),
            name_origin: take("name_origin"),
            meaning_origin: take("meaning_origin"),
            trivia: take("trivia"),
        }
    }
}

/// What happened to one discovered data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded { encoding: &'static str, rows: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub status: SourceStatus,
}

impl SourceFile {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, SourceStatus::Loaded { .. })
    }
}

/// A non-fatal problem found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
