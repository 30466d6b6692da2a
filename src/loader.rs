//! Dataset loading.
//!
//! Discovers data files directly under the configured directory, decodes
//! each one with an ordered encoding fallback, parses it as CSV, then
//! concatenates the rows and drops duplicate names (first one wins).
//!
//! A file that cannot be read, decoded, or parsed is skipped with a
//! [`LoadWarning`]. The load only fails when no file parsed at all.
//!
//! [`DatasetLoader`] keeps the resulting [`RecordStore`] for the rest of
//! the process; [`DatasetLoader::reload`] is the only way to re-read the
//! directory.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use encoding_rs::Encoding;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::DataConfig;
use crate::models::{FlowerRecord, LoadWarning, SourceFile, SourceStatus, FIELDS};
use crate::store::{LoadReport, RecordStore};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing usable was found: no matching files, or none of them parsed.
    #[error("no flower data found in {}", dir.display())]
    NoDataFound { dir: PathBuf },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Why a single file was skipped.
#[derive(Debug, Error)]
enum FileError {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("could not decode as any of: {tried}")]
    Undecodable { tried: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        found: usize,
        expected: usize,
    },
}

struct ParsedFile {
    encoding: &'static Encoding,
    records: Vec<FlowerRecord>,
    /// Only reported if the whole file parses.
    warnings: Vec<LoadWarning>,
}

/// Loads the dataset once and hands out the shared store afterwards.
pub struct DatasetLoader {
    config: DataConfig,
    cached: Mutex<Option<Arc<RecordStore>>>,
}

impl DatasetLoader {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            config: config.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached store, loading it on first use.
    ///
    /// Failed loads are not cached.
    pub fn load(&self) -> Result<Arc<RecordStore>, LoadError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = cached.as_ref() {
            debug!("dataset cache hit ({} records)", store.len());
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(load_dataset(&self.config)?);
        *cached = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Drops the cached store so the next [`load`](Self::load) re-reads files.
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }

    pub fn reload(&self) -> Result<Arc<RecordStore>, LoadError> {
        self.invalidate();
        self.load()
    }
}

/// Reads every matching file under `config.dir` into a fresh store.
pub fn load_dataset(config: &DataConfig) -> Result<RecordStore, LoadError> {
    let files = discover_files(config)?;
    if files.is_empty() {
        return Err(LoadError::NoDataFound {
            dir: config.dir.clone(),
        });
    }

    let encodings = resolve_encodings(&config.encodings);
    let mut sources = Vec::with_capacity(files.len());
    let mut warnings = Vec::new();
    let mut rows = Vec::new();

    for path in files {
        match read_file(&path, &encodings) {
            Ok(parsed) => {
                debug!(
                    "{}: {} rows as {}",
                    path.display(),
                    parsed.records.len(),
                    parsed.encoding.name()
                );
                sources.push(SourceFile {
                    path,
                    status: SourceStatus::Loaded {
                        encoding: parsed.encoding.name(),
                        rows: parsed.records.len(),
                    },
                });
                rows.extend(parsed.records);
                warnings.extend(parsed.warnings);
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                warnings.push(LoadWarning {
                    path: path.clone(),
                    message: format!("skipped: {}", e),
                });
                sources.push(SourceFile {
                    path,
                    status: SourceStatus::Skipped {
                        reason: e.to_string(),
                    },
                });
            }
        }
    }

    if !sources.iter().any(SourceFile::is_loaded) {
        return Err(LoadError::NoDataFound {
            dir: config.dir.clone(),
        });
    }

    let rows_read = rows.len();
    let records = dedup_by_name(rows);
    let duplicates = rows_read - records.len();
    info!(
        "loaded {} records from {} files ({} duplicates dropped, {} warnings)",
        records.len(),
        sources.iter().filter(|s| s.is_loaded()).count(),
        duplicates,
        warnings.len()
    );

    Ok(RecordStore::new(
        records,
        LoadReport {
            sources,
            warnings,
            rows_read,
            duplicates,
        },
    ))
}

/// Matching files directly under the data directory, in file-name order.
fn discover_files(config: &DataConfig) -> Result<Vec<PathBuf>, LoadError> {
    let root = &config.dir;
    if !root.is_dir() {
        debug!("data directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let include_set = build_globset(&config.include_globs)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("cannot read entry in {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if include_set.is_match(file_name.as_ref()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, LoadError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Resolves encoding labels, keeping order and dropping repeats.
///
/// `shift_jis` and `windows-31j` resolve to the same decoder.
fn resolve_encodings(labels: &[String]) -> Vec<&'static Encoding> {
    let mut encodings: Vec<&'static Encoding> = Vec::new();
    for label in labels {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if !encodings.contains(&encoding) => encodings.push(encoding),
            Some(_) => {}
            None => warn!("ignoring unknown encoding label '{}'", label),
        }
    }
    encodings
}

fn read_file(path: &Path, encodings: &[&'static Encoding]) -> Result<ParsedFile, FileError> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode(&bytes, encodings).ok_or_else(|| FileError::Undecodable {
        tried: encodings
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", "),
    })?;
    let mut warnings = Vec::new();
    let records = parse_records(path, &text, &mut warnings)?;
    Ok(ParsedFile {
        encoding,
        records,
        warnings,
    })
}

/// Strict decode: the first encoding that produces no malformed sequences wins.
fn decode(bytes: &[u8], encodings: &[&'static Encoding]) -> Option<(String, &'static Encoding)> {
    for &encoding in encodings {
        let input = if encoding == encoding_rs::UTF_8 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        match encoding.decode_without_bom_handling_and_without_replacement(input) {
            Some(text) => return Some((text.into_owned(), encoding)),
            None => debug!("not valid {}", encoding.name()),
        }
    }
    None
}

fn parse_records(
    path: &Path,
    text: &str,
    warnings: &mut Vec<LoadWarning>,
) -> Result<Vec<FlowerRecord>, FileError> {
    // short rows are padded with empty values; long rows fail the file
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut columns: HashMap<&str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        columns.entry(header.trim()).or_insert(idx);
    }

    if !columns.contains_key("name") {
        return Err(FileError::MissingColumn("name"));
    }
    for field in FIELDS.iter().filter(|f| !columns.contains_key(**f)) {
        warnings.push(LoadWarning {
            path: path.to_path_buf(),
            message: format!("missing column '{}', values left empty", field),
        });
    }
    for extra in columns.keys().filter(|c| !FIELDS.contains(*c)) {
        debug!("{}: ignoring column '{}'", path.display(), extra);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(FileError::TooManyFields {
                line: row.position().map(|p| p.line()).unwrap_or_default(),
                found: row.len(),
                expected: headers.len(),
            });
        }
        let record =
            FlowerRecord::from_columns(|field| columns.get(field).and_then(|&idx| row.get(idx)));
        if record.name.is_empty() {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            warnings.push(LoadWarning {
                path: path.to_path_buf(),
                message: format!("line {}: empty name, row skipped", line),
            });
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

fn dedup_by_name(rows: Vec<FlowerRecord>) -> Vec<FlowerRecord> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|record| {
            let first = seen.insert(record.name.clone());
            if !first {
                debug!("dropping duplicate '{}'", record.name);
            }
            first
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8};

    fn encodings() -> Vec<&'static Encoding> {
        resolve_encodings(&[
            "utf-8".to_string(),
            "shift_jis".to_string(),
            "windows-31j".to_string(),
        ])
    }

    #[test]
    fn test_resolve_encodings_drops_aliases() {
        let resolved = encodings();
        assert_eq!(resolved, vec![UTF_8, SHIFT_JIS]);
    }

    #[test]
    fn test_decode_prefers_utf8() {
        let (text, encoding) = decode("name\nバラ\n".as_bytes(), &encodings()).unwrap();
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "name\nバラ\n");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let (text, _) = decode(b"\xEF\xBB\xBFname\nRose\n", &encodings()).unwrap();
        assert!(text.starts_with("name"));
    }

    #[test]
    fn test_decode_falls_back_to_shift_jis() {
        let (bytes, _, had_errors) = SHIFT_JIS.encode("name,meaning\nバラ,愛\n");
        assert!(!had_errors);
        let (text, encoding) = decode(&bytes, &encodings()).unwrap();
        assert_eq!(encoding, SHIFT_JIS);
        assert!(text.contains("バラ,愛"));
    }

    #[test]
    fn test_decode_gives_up() {
        assert!(decode(b"name\n\xff\xff\n", &encodings()).is_none());
    }

    #[test]
    fn test_parse_records_normalizes_missing_values() {
        let mut warnings = Vec::new();
        let text = "name,meaning,trivia\nRose,Love,\nLily,,White\n";
        let records = parse_records(Path::new("t.csv"), text, &mut warnings).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trivia, "");
        assert_eq!(records[1].meaning, "");
        assert_eq!(records[1].birth_flower, "");
        // birth_flower, name_origin, meaning_origin
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_parse_records_requires_name_column() {
        let mut warnings = Vec::new();
        let err = parse_records(Path::new("t.csv"), "title,meaning\nRose,Love\n", &mut warnings)
            .unwrap_err();
        assert!(matches!(err, FileError::MissingColumn("name")));
    }

    #[test]
    fn test_parse_records_rejects_long_rows() {
        let mut warnings = Vec::new();
        let text = "name,meaning\nRose,Love\nLily,Purity,extra\n";
        let err = parse_records(Path::new("t.csv"), text, &mut warnings).unwrap_err();
        assert!(matches!(
            err,
            FileError::TooManyFields {
                line: 3,
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_parse_records_pads_short_rows() {
        let mut warnings = Vec::new();
        let text = "name,meaning,birth_flower,name_origin,meaning_origin,trivia\nLily,Purity,,,,\nTulip,Charity\n";
        let records = parse_records(Path::new("t.csv"), text, &mut warnings).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Tulip");
        assert_eq!(records[1].meaning, "Charity");
        assert_eq!(records[1].trivia, "");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_read_file_keeps_warnings_local() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("b.csv");
        std::fs::write(&path, "name,meaning\n,orphan\nLily,Purity,extra\n").unwrap();
        assert!(read_file(&path, &encodings()).is_err());

        let path = dir.path().join("c.csv");
        std::fs::write(&path, "name,meaning\n,orphan\nLily,Purity\n").unwrap();
        let parsed = read_file(&path, &encodings()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        // four missing columns, one empty name
        assert_eq!(parsed.warnings.len(), 5);
    }

    #[test]
    fn test_parse_records_skips_empty_names() {
        let mut warnings = Vec::new();
        let text = "name,meaning,birth_flower,name_origin,meaning_origin,trivia\n,Orphan,,,,\nRose,Love,,,,\n";
        let records = parse_records(Path::new("t.csv"), text, &mut warnings).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("empty name"));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let rows = vec![
            FlowerRecord {
                name: "Rose".into(),
                meaning: "first".into(),
                ..Default::default()
            },
            FlowerRecord {
                name: "Lily".into(),
                ..Default::default()
            },
            FlowerRecord {
                name: "Rose".into(),
                meaning: "second".into(),
                ..Default::default()
            },
        ];
        let records = dedup_by_name(rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].meaning, "first");
        assert_eq!(records[1].name, "Lily");
    }
}
