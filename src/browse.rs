//! Catalogue browsing: the sorted name list, a single flower's card, and
//! a bare image lookup.

use std::io::Write;

use anyhow::{bail, Result};

use crate::app::App;
use crate::display;

pub fn run_list<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let names = app.store().names();
    for name in &names {
        writeln!(out, "{}", name)?;
    }
    writeln!(out, "\n{} flowers", names.len())?;
    Ok(())
}

pub fn run_show<W: Write>(app: &App, name: &str, out: &mut W) -> Result<()> {
    let record = match app.store().get_by_name(name) {
        Some(record) => record,
        None => bail!("flower not found: {}", name),
    };

    write!(out, "{}", display::full_card(record))?;
    if let Some(line) = app.image_line(&record.name) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Resolves an image for any name, in the dataset or not.
pub fn run_image<W: Write>(app: &App, name: &str, out: &mut W) -> Result<()> {
    match app.image_line(name) {
        Some(line) => writeln!(out, "{}", line)?,
        None => writeln!(out, "Image lookup is turned off.")?,
    }
    Ok(())
}
