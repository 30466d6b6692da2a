//! Interactive meaning quiz.
//!
//! Shows a flower's meaning (and its trivia as a hint) and asks which
//! flower it belongs to. Commands are read one per line:
//! `a` reveals the answer, `n` moves on, `q` or end of input quits.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;

use crate::app::App;
use crate::models::FlowerRecord;
use crate::session::Session;

pub fn run_quiz<I: BufRead, W: Write, R: Rng + ?Sized>(
    app: &App,
    session: &mut Session,
    rng: &mut R,
    input: &mut I,
    out: &mut W,
) -> Result<()> {
    let mut announce = true;
    let mut line = String::new();

    loop {
        let Some(question) = session.current_quiz(app.store(), rng) else {
            writeln!(out, "No flowers to quiz on.")?;
            return Ok(());
        };

        if announce {
            print_question(question, out)?;
            announce = false;
        }

        write!(out, "[a]nswer  [n]ext  [q]uit > ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match line.trim() {
            "a" | "answer" => {
                if session.show_answer() {
                    writeln!(out, "Answer already shown: {}", question.name)?;
                } else {
                    session.reveal();
                    print_answer(app, question, out)?;
                }
            }
            "n" | "next" => {
                session.next_question(app.store(), rng);
                announce = true;
            }
            "q" | "quit" => break,
            other => writeln!(out, "Unknown choice '{}'.", other)?,
        }
    }

    Ok(())
}

fn print_question<W: Write>(question: &FlowerRecord, out: &mut W) -> Result<()> {
    writeln!(out, "\nWhich flower means:\n\n    {}\n", question.meaning)?;
    if !question.trivia.is_empty() {
        writeln!(out, "Hint: {}\n", question.trivia)?;
    }
    Ok(())
}

fn print_answer<W: Write>(app: &App, question: &FlowerRecord, out: &mut W) -> Result<()> {
    writeln!(out, "Answer: {}", question.name)?;
    if let Some(line) = app.image_line(&question.name) {
        writeln!(out, "{}", line)?;
    }
    if !question.meaning_origin.is_empty() {
        writeln!(out, "Origin: {}", question.meaning_origin)?;
    }
    Ok(())
}
