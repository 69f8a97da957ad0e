use std::path::Path;

use anyhow::{Context, Result};

const HEADER: &str = "company name";

/// Company names from the first column of a CSV-like file.
///
/// A leading `Company Name` header row and blank rows are skipped.
pub fn read_companies(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading companies from {}", path.display()))?;
    Ok(parse_companies(&contents))
}

pub fn parse_companies(contents: &str) -> Vec<String> {
    first_fields(contents.trim_start_matches('\u{feff}'))
        .into_iter()
        .enumerate()
        .filter(|(i, name)| !(*i == 0 && name.eq_ignore_ascii_case(HEADER)))
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
        .collect()
}

/// First field of every record. Quoted fields may hold commas, doubled
/// quotes and line breaks, in any column.
fn first_fields(contents: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut first = String::new();
    let mut column = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut pending = false;

    let mut chars = contents.chars().peekable();
    while let Some(c) = chars.next() {
        pending = true;
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    if column == 0 {
                        first.push('"');
                    }
                } else {
                    in_quotes = false;
                }
            }
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            ',' if !in_quotes => {
                column += 1;
                field_start = true;
            }
            '\n' if !in_quotes => {
                records.push(collapse(&first));
                first.clear();
                column = 0;
                field_start = true;
                pending = false;
            }
            '\r' if !in_quotes => {}
            _ => {
                if !c.is_whitespace() {
                    field_start = false;
                }
                if column == 0 {
                    first.push(c);
                }
            }
        }
    }

    if pending {
        records.push(collapse(&first));
    }
    records
}

/// Search queries want one line, so embedded line breaks become spaces.
fn collapse(field: &str) -> String {
    field.split_whitespace().collect::<Vec<_>>().join(" ")
}
