// ============================================================
// Layer 4 — CSV Prompt Loader
// ============================================================
// Loads jailbreak prompts from a CSV dataset file.
//
// Public jailbreak datasets come as CSV with inconsistent
// column names, so the loader detects the text column:
// it prefers a known header name and otherwise falls back to
// the first column. Every row supplies one JAILBREAK-labelled
// prompt; the safe side of the corpus comes from the seed
// corpus and the synthetic generator instead.
//
// Parsing handles quoted fields (embedded commas, doubled
// quotes, and newlines inside quotes), which prompt datasets
// rely on heavily — prompts are full of commas.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::prompt::LabeledPrompt;
use crate::domain::traits::PromptSource;

/// Header names tried in order when locating the text column.
const PREFERRED_COLUMNS: [&str; 6] = [
    "prompt", "text", "content", "instruction", "query", "jailbreak_prompt",
];

/// Loads jailbreak prompts from one CSV file.
/// Implements the PromptSource trait from Layer 3.
pub struct CsvPromptLoader {
    path: String,
}

impl CsvPromptLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PromptSource for CsvPromptLoader {
    fn load_all(&self) -> Result<Vec<LabeledPrompt>> {
        let path = Path::new(&self.path);

        // Missing dataset is not fatal: the seed corpus still
        // allows a demo training run.
        if !path.exists() {
            tracing::warn!(
                "Dataset '{}' does not exist — returning empty corpus",
                self.path
            );
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", self.path))?;

        let rows = parse_csv(&raw);
        if rows.is_empty() {
            tracing::warn!("Dataset '{}' is empty", self.path);
            return Ok(Vec::new());
        }

        // First row is the header; pick the text column from it
        let header = &rows[0];
        let column = detect_text_column(header);
        tracing::info!(
            "Loading jailbreak prompts from '{}' column '{}'",
            self.path,
            header.get(column).map(String::as_str).unwrap_or("?"),
        );

        let mut prompts = Vec::new();
        for row in &rows[1..] {
            if let Some(text) = row.get(column) {
                let text = text.trim();
                if !text.is_empty() {
                    prompts.push(LabeledPrompt::jailbreak(text));
                }
            }
        }

        tracing::info!("Loaded {} jailbreak prompts", prompts.len());
        Ok(prompts)
    }
}

/// Pick the index of the text column from the header row:
/// a preferred name if present, otherwise column 0.
fn detect_text_column(header: &[String]) -> usize {
    for name in PREFERRED_COLUMNS {
        if let Some(idx) = header.iter().position(|h| h.trim().eq_ignore_ascii_case(name)) {
            return idx;
        }
    }
    0
}

/// Minimal CSV reader: comma separated, double-quote quoting,
/// doubled quotes as escapes, newlines allowed inside quotes.
fn parse_csv(raw: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // A doubled quote inside a quoted field is a
                    // literal quote; a single one closes the field
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => {
                row.push(std::mem::take(&mut field));
            }
            '\r' => {
                // Swallow the \r of \r\n; a bare \r ends the row too
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Trailing row without a final newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    // Drop fully empty rows (e.g. trailing blank lines)
    rows.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    rows
}
