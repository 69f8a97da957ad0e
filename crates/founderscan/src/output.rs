use std::io::Write;

use anyhow::Result;
use founderscan_core::ExtractionResult;

use crate::cli::Format;

pub const CSV_HEADER: [&str; 3] = ["Company Name", "Founder Names", "Source"];

pub fn write_results<W: Write>(out: &mut W, results: &[ExtractionResult], format: Format) -> Result<()> {
    match format {
        Format::Csv => write_csv(out, results),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_csv<W: Write>(out: &mut W, results: &[ExtractionResult]) -> Result<()> {
    write_row(out, &CSV_HEADER)?;

    for result in results {
        let founders = result
            .founders()
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write_row(
            out,
            &[result.company_name(), founders.as_str(), result.source().label()],
        )?;
    }

    Ok(())
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{line}")?;
    Ok(())
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("Acme"), "Acme");
        assert_eq!(escape_field("Acme, Inc"), "\"Acme, Inc\"");
        assert_eq!(escape_field("The \"Best\" Co"), "\"The \"\"Best\"\" Co\"");
    }

    #[test]
    fn test_csv_header_only_for_no_results() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[], Format::Csv).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "Company Name,Founder Names,Source\n");
    }

    #[test]
    fn test_json_empty_array() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[], Format::Json).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }
}
