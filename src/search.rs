use std::io::Write;

use anyhow::Result;

use crate::app::App;
use crate::display;

/// Prints every flower with a field containing `query`, images looked up
/// one after another.
pub fn run_search<W: Write>(app: &App, query: &str, out: &mut W) -> Result<()> {
    if query.is_empty() {
        writeln!(out, "No results.")?;
        return Ok(());
    }

    let results = app.store().search(query);
    if results.is_empty() {
        writeln!(out, "No results.")?;
        return Ok(());
    }

    writeln!(out, "{} results for \"{}\"", results.len(), query)?;
    for record in results {
        writeln!(out, "{}", "-".repeat(40))?;
        write!(out, "{}", display::summary_card(record))?;
        if let Some(line) = app.image_line(&record.name) {
            writeln!(out, "  {}", line)?;
        }
    }
    Ok(())
}
