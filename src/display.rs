//! Plain-text rendering of records and image lookups.

use crate::image::ImageLookup;
use crate::models::FlowerRecord;

/// Everything about one flower.
pub fn full_card(record: &FlowerRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", record.name));
    out.push_str(&format!("{}\n", "=".repeat(record.name.chars().count().max(4))));
    out.push_str(&format!("Meaning:        {}\n", record.meaning));
    out.push_str(&format!("Birth flower:   {}\n", record.birth_flower));
    out.push_str(&format!("Name origin:    {}\n", record.name_origin));
    out.push_str(&format!("Meaning origin: {}\n", record.meaning_origin));
    out.push_str(&format!("Trivia:         {}\n", record.trivia));
    out
}

/// Short form used in search results.
pub fn summary_card(record: &FlowerRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", record.name));
    out.push_str(&format!("  Meaning: {}\n", record.meaning));
    if !record.meaning_origin.is_empty() {
        out.push_str(&format!("  Origin:  {}\n", record.meaning_origin));
    }
    if !record.trivia.is_empty() {
        out.push_str(&format!("  Trivia:  {}\n", record.trivia));
    }
    out
}

/// `Image: <url> (source: <label>)` on success, a placeholder otherwise.
///
/// The failure reason is only shown in debug mode.
pub fn image_line(lookup: &ImageLookup, source: &str, debug: bool) -> String {
    match lookup {
        Ok(url) => format!("Image: {} (source: {})", url, source),
        Err(reason) if debug => format!("(no image) [debug: {}]", reason),
        Err(_) => "(no image)".to_string(),
    }
}
