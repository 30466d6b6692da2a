use std::io::Write;

use anyhow::Result;
use rand::Rng;

use crate::app::App;
use crate::display;
use crate::session::Session;

/// Draws a flower into the session and prints its full card.
pub fn run_random<W: Write, R: Rng + ?Sized>(
    app: &App,
    session: &mut Session,
    rng: &mut R,
    out: &mut W,
) -> Result<()> {
    let record = match session.draw_random(app.store(), rng) {
        Some(record) => record,
        None => {
            writeln!(out, "No flowers to pick from.")?;
            return Ok(());
        }
    };

    write!(out, "{}", display::full_card(record))?;
    if let Some(line) = app.image_line(&record.name) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
