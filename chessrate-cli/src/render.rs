//! Output rendering: aligned text table or JSON

use crate::types::ResultRow;
use serde::Serialize;
use std::fmt::Write as _;

/// Shown instead of a table when there is nothing to display
pub const EMPTY_NOTICE: &str =
    "No handles to compare. Enter Lichess and Chess.com handles, comma-separated, in both lists.";

const HEADERS: [&str; 6] = [
    "#",
    "Player (Lichess / Chess.com)",
    "Lichess Bullet",
    "Lichess Blitz",
    "Chess.com Bullet",
    "Chess.com Blitz",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Row with its 1-based position, as emitted in JSON mode
#[derive(Serialize)]
struct NumberedRow<'a> {
    number: usize,
    #[serde(flatten)]
    row: &'a ResultRow,
}

pub fn render(rows: &[ResultRow], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => Ok(render_table(rows)),
        OutputFormat::Json => render_json(rows),
    }
}

/// Text table with a numbered first column. Empty input yields [`EMPTY_NOTICE`].
pub fn render_table(rows: &[ResultRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY_NOTICE);
    }

    let body: Vec<[String; 6]> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let [lb, lz, cb, cz] = row.cells();
            [
                (i + 1).to_string(),
                row.label().to_string(),
                lb.to_string(),
                lz.to_string(),
                cb.to_string(),
                cz.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for line in &body {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, w))| {
            // numbers and ratings right-aligned, label left-aligned
            if col == 1 {
                format!("{:<w$}", cell, w = *w)
            } else {
                format!("{:>w$}", cell, w = *w)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

pub fn render_json(rows: &[ResultRow]) -> Result<String, serde_json::Error> {
    let numbered: Vec<NumberedRow<'_>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| NumberedRow { number: i + 1, row })
        .collect();
    serde_json::to_string_pretty(&numbered)
}
