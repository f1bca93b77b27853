//! Parsers for the Quran reference data files.
//!
//! Two formats are supported:
//! - verse text, one `surah|ayah|text` record per line (Tanzil export);
//! - hizb boundaries, a JSON object of `{hizb_number, first_verse_key, last_verse_key}`.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{HizbIndexEntry, QuranAyah, VerseKey};

/// Errors raised while parsing reference data.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    InvalidVerseKey(String),

    #[error("Invalid hizb number for entry {key}: {value}")]
    InvalidHizbNumber { key: String, value: String },

    #[error("Invalid hizb index file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No {0} found in input")]
    Empty(&'static str),
}

/// Fails when a parsed file yielded no row, so an import never runs empty.
pub fn ensure_rows<T>(rows: &[T], what: &'static str) -> Result<(), ImportError> {
    if rows.is_empty() {
        return Err(ImportError::Empty(what));
    }
    Ok(())
}

/// Result of parsing a verse text file.
#[derive(Debug, Clone, Default)]
pub struct ParsedText {
    /// Non-empty lines read from the file.
    pub lines: usize,
    /// Verses successfully parsed, in file order.
    pub rows: Vec<QuranAyah>,
}

impl ParsedText {
    /// Lines that were read but did not yield a verse.
    pub fn skipped(&self) -> usize {
        self.lines - self.rows.len()
    }
}

/// Drops a leading UTF-8 byte order mark, as left by some editors.
fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

fn parse_positive(field: &str) -> Option<i32> {
    field.trim().parse::<i32>().ok().filter(|n| *n > 0)
}

/// Parses one `surah|ayah|text` line.
///
/// The text keeps any further `|` characters. Returns `None` for lines with
/// fewer than three fields, a non-numeric or zero surah/ayah, or empty text.
pub fn parse_text_line(line: &str) -> Option<QuranAyah> {
    let mut fields = line.splitn(3, '|');
    let surah = parse_positive(fields.next()?)?;
    let ayah = parse_positive(fields.next()?)?;
    let text_ar = fields.next()?.trim();
    if text_ar.is_empty() {
        return None;
    }
    Some(QuranAyah {
        surah,
        ayah,
        text_ar: text_ar.to_string(),
    })
}

/// Parses a whole verse text file, skipping empty and malformed lines.
pub fn parse_quran_text(content: &str) -> ParsedText {
    let mut parsed = ParsedText::default();
    for line in strip_bom(content).lines().filter(|l| !l.is_empty()) {
        parsed.lines += 1;
        if let Some(row) = parse_text_line(line) {
            parsed.rows.push(row);
        }
    }
    parsed
}

#[derive(Debug, Deserialize)]
struct HizbRecord {
    hizb_number: serde_json::Value,
    first_verse_key: String,
    last_verse_key: String,
}

fn hizb_number(key: &str, value: &serde_json::Value) -> Result<i32, ImportError> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    number
        .filter(|n| *n > 0)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ImportError::InvalidHizbNumber {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn verse_key(raw: &str) -> Result<VerseKey, ImportError> {
    raw.parse().map_err(ImportError::InvalidVerseKey)
}

/// Parses a hizb boundary file into index rows sorted by hizb number.
pub fn parse_hizb_index(content: &str) -> Result<Vec<HizbIndexEntry>, ImportError> {
    let records: BTreeMap<String, HizbRecord> = serde_json::from_str(strip_bom(content))?;

    let mut rows = records
        .iter()
        .map(|(key, record)| {
            Ok(HizbIndexEntry::new(
                hizb_number(key, &record.hizb_number)?,
                verse_key(&record.first_verse_key)?,
                verse_key(&record.last_verse_key)?,
            ))
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    rows.sort_by_key(|row| row.hizb);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_line() {
        let row = parse_text_line("2|255|ٱللَّهُ لَآ إِلَٰهَ إِلَّا هُوَ").unwrap();
        assert_eq!(row.surah, 2);
        assert_eq!(row.ayah, 255);
        assert_eq!(row.text_ar, "ٱللَّهُ لَآ إِلَٰهَ إِلَّا هُوَ");
    }

    #[test]
    fn test_parse_text_line_keeps_extra_pipes_and_trims() {
        let row = parse_text_line("1|1|  a|b|c  ").unwrap();
        assert_eq!(row.text_ar, "a|b|c");
    }

    #[test]
    fn test_parse_text_line_skips_malformed() {
        assert!(parse_text_line("2|255").is_none());
        assert!(parse_text_line("x|1|text").is_none());
        assert!(parse_text_line("1|y|text").is_none());
        assert!(parse_text_line("0|1|text").is_none());
        assert!(parse_text_line("1|0|text").is_none());
        assert!(parse_text_line("1|1|   ").is_none());
        assert!(parse_text_line("1|1|").is_none());
        assert!(parse_text_line("# Tanzil Quran Text").is_none());
    }

    #[test]
    fn test_parse_quran_text_counts_lines() {
        let content = "1|1|بِسْمِ ٱللَّهِ\r\n1|2|ٱلْحَمْدُ لِلَّهِ\n\n# comment\n2|x|bad\n";
        let parsed = parse_quran_text(content);
        assert_eq!(parsed.lines, 4);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped(), 2);
        assert_eq!(parsed.rows[0].key(), VerseKey::new(1, 1));
        assert_eq!(parsed.rows[1].text_ar, "ٱلْحَمْدُ لِلَّهِ");
    }

    #[test]
    fn test_parse_quran_text_with_bom_keeps_first_verse() {
        let parsed = parse_quran_text("\u{feff}1|1|بِسْمِ ٱللَّهِ\n1|2|ٱلْحَمْدُ لِلَّهِ\n");
        assert_eq!(parsed.lines, 2);
        assert_eq!(parsed.skipped(), 0);
        assert_eq!(parsed.rows[0].key(), VerseKey::new(1, 1));
    }

    #[test]
    fn test_parse_hizb_index_with_bom() {
        let content = "\u{feff}{\"1\": {\"hizb_number\": 1, \"first_verse_key\": \"1:1\", \"last_verse_key\": \"2:25\"}}";
        let rows = parse_hizb_index(content).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].end(), VerseKey::new(2, 25));
    }

    #[test]
    fn test_parse_quran_text_empty() {
        let parsed = parse_quran_text("");
        assert_eq!(parsed.lines, 0);
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_ensure_rows_rejects_empty_input() {
        let parsed = parse_quran_text("# header only\n\n");
        let err = ensure_rows(&parsed.rows, "verse").unwrap_err();
        assert!(matches!(err, ImportError::Empty("verse")));
        assert_eq!(err.to_string(), "No verse found in input");

        let rows = parse_hizb_index("{}").unwrap();
        assert!(matches!(
            ensure_rows(&rows, "hizb entry"),
            Err(ImportError::Empty("hizb entry"))
        ));
    }

    #[test]
    fn test_ensure_rows_accepts_parsed_rows() {
        let parsed = parse_quran_text("1|1|text\n");
        assert!(ensure_rows(&parsed.rows, "verse").is_ok());
    }

    #[test]
    fn test_parse_hizb_index_single_record() {
        let content =
            r#"{"1": {"hizb_number": 1, "first_verse_key": "1:1", "last_verse_key": "2:25"}}"#;
        let rows = parse_hizb_index(content).unwrap();
        assert_eq!(
            rows,
            vec![HizbIndexEntry {
                hizb: 1,
                start_surah: 1,
                start_ayah: 1,
                end_surah: 2,
                end_ayah: 25,
            }]
        );
    }

    #[test]
    fn test_parse_hizb_index_sorts_by_hizb_number() {
        let content = r#"{
            "10": {"hizb_number": 10, "first_verse_key": "5:27", "last_verse_key": "5:50"},
            "2": {"hizb_number": "2", "first_verse_key": "2:26", "last_verse_key": "2:43"},
            "1": {"hizb_number": 1, "first_verse_key": "1:1", "last_verse_key": "2:25", "extra": true}
        }"#;
        let rows = parse_hizb_index(content).unwrap();
        let hizbs: Vec<i32> = rows.iter().map(|r| r.hizb).collect();
        assert_eq!(hizbs, vec![1, 2, 10]);
        assert_eq!(rows[1].start(), VerseKey::new(2, 26));
    }

    #[test]
    fn test_parse_hizb_index_invalid_verse_key() {
        let content =
            r#"{"1": {"hizb_number": 1, "first_verse_key": "1:0", "last_verse_key": "2:25"}}"#;
        let err = parse_hizb_index(content).unwrap_err();
        assert_eq!(err.to_string(), "Invalid verse key: 1:0");
    }

    #[test]
    fn test_parse_hizb_index_invalid_hizb_number() {
        let content =
            r#"{"a": {"hizb_number": null, "first_verse_key": "1:1", "last_verse_key": "2:25"}}"#;
        let err = parse_hizb_index(content).unwrap_err();
        assert!(matches!(err, ImportError::InvalidHizbNumber { ref key, .. } if key == "a"));
    }

    #[test]
    fn test_parse_hizb_index_malformed_json() {
        assert!(matches!(
            parse_hizb_index("[1, 2, 3]"),
            Err(ImportError::Json(_))
        ));
        assert!(matches!(
            parse_hizb_index(r#"{"1": {"hizb_number": 1}}"#),
            Err(ImportError::Json(_))
        ));
    }
}
