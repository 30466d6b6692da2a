use std::io::Write;

use anyhow::Result;

use crate::app::App;
use crate::models::SourceStatus;

/// Lists every discovered data file and what the loader made of it.
pub fn list_sources<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let store = app.store();
    let report = store.report();

    writeln!(out, "{:<32} {:<12} {:>6}  NOTE", "FILE", "ENCODING", "ROWS")?;
    for source in &report.sources {
        let file = source
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.path.display().to_string());
        match &source.status {
            SourceStatus::Loaded { encoding, rows } => {
                writeln!(out, "{:<32} {:<12} {:>6}  ok", file, encoding, rows)?;
            }
            SourceStatus::Skipped { reason } => {
                writeln!(out, "{:<32} {:<12} {:>6}  skipped: {}", file, "-", "-", reason)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "rows read:          {}", report.rows_read)?;
    writeln!(out, "duplicates dropped: {}", report.duplicates)?;
    writeln!(out, "records:            {}", store.len())?;
    writeln!(out, "warnings:           {}", report.warnings.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlowerRecord, SourceFile};
    use crate::store::{LoadReport, RecordStore};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_lists_loaded_and_skipped_files() {
        let report = LoadReport {
            sources: vec![
                SourceFile {
                    path: PathBuf::from("data/a.csv"),
                    status: SourceStatus::Loaded {
                        encoding: "UTF-8",
                        rows: 2,
                    },
                },
                SourceFile {
                    path: PathBuf::from("data/b.csv"),
                    status: SourceStatus::Skipped {
                        reason: "missing required column 'name'".to_string(),
                    },
                },
            ],
            warnings: Vec::new(),
            rows_read: 2,
            duplicates: 1,
        };
        let store = RecordStore::new(
            vec![FlowerRecord {
                name: "Rose".to_string(),
                ..Default::default()
            }],
            report,
        );
        let app = App::new(Arc::new(store), None, false);

        let mut out = Vec::new();
        list_sources(&app, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("a.csv"));
        assert!(text.contains("UTF-8"));
        assert!(text.contains("skipped: missing required column 'name'"));
        assert!(text.contains("duplicates dropped: 1"));
        assert!(text.contains("records:            1"));
    }
}
