// Console rendering of the smoke test. Everything here writes to stdout in
// production and to a buffer in tests.

use crate::schema::{ColumnDescriptor, MappingPrediction};
use std::io::{self, Write};

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Testing Enhanced ML Service...")?;
    writeln!(out, "{}", "=".repeat(50))
}

pub fn write_health_status<W: Write>(out: &mut W, status: u16) -> io::Result<()> {
    writeln!(out, "Health Check Status: {}", status)
}

pub fn write_health_body<W: Write>(out: &mut W, body: &serde_json::Value) -> io::Result<()> {
    writeln!(out, "Health Response: {}", body)?;
    writeln!(out)
}

pub fn write_prediction_status<W: Write>(out: &mut W, status: u16) -> io::Result<()> {
    writeln!(out, "Prediction Status: {}", status)
}

pub fn write_suggestions_header<W: Write>(out: &mut W, count: usize) -> io::Result<()> {
    writeln!(out, "Number of predictions: {}", count)?;
    writeln!(out, "\nMapping Suggestions:")?;
    writeln!(out, "{}", "-".repeat(80))
}

/// One numbered suggestion; `position` starts at 1.
pub fn write_suggestion<W: Write>(
    out: &mut W,
    position: usize,
    source: &ColumnDescriptor,
    destination: &ColumnDescriptor,
    prediction: &MappingPrediction,
) -> io::Result<()> {
    writeln!(out, "{}. {} -> {}", position, source.name, destination.name)?;
    writeln!(out, "   Confidence: {}", format_confidence(prediction.confidence))?;
    writeln!(out, "   Type: {}", prediction.suggested_type)?;
    writeln!(out, "   Reason: {}", prediction.reason)?;
    writeln!(out)
}

pub fn write_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "Error: {}", message)
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.3}", confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn confidence_has_three_decimals() {
        assert_eq!(format_confidence(0.8234567), "0.823");
        assert_eq!(format_confidence(0.95), "0.950");
        assert_eq!(format_confidence(1.0), "1.000");
        assert_eq!(format_confidence(0.0), "0.000");
    }

    #[test]
    fn health_shows_status_and_body() {
        let text = render(|out| {
            write_health_status(out, 200)?;
            write_health_body(out, &json!({"status": "ok"}))
        });
        assert_eq!(text, "Health Check Status: 200\nHealth Response: {\"status\":\"ok\"}\n\n");
    }

    #[test]
    fn suggestion_layout() {
        let source = ColumnDescriptor::new("src_6", "age", "INTEGER", false, true);
        let destination = ColumnDescriptor::new("dest_5", "date_of_birth", "DATE", false, true);
        let prediction = MappingPrediction {
            source_column_id: "src_6".to_string(),
            destination_column_id: "dest_5".to_string(),
            confidence: 0.41249,
            suggested_type: "DATE".to_string(),
            reason: "semantic similarity".to_string(),
        };

        let text = render(|out| write_suggestion(out, 3, &source, &destination, &prediction));
        assert_eq!(
            text,
            "3. age -> date_of_birth\n   Confidence: 0.412\n   Type: DATE\n   Reason: semantic similarity\n\n"
        );
    }

    #[test]
    fn header_counts_and_divider() {
        let text = render(|out| write_suggestions_header(out, 2));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Number of predictions: 2");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Mapping Suggestions:");
        assert_eq!(lines[3].len(), 80);
        assert!(lines[3].chars().all(|c| c == '-'));
    }
}
