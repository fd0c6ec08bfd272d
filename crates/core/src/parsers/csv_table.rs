use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use crate::model::RawRecord;

#[derive(Debug, Error)]
pub enum CsvParseError {
    #[error("unreadable header row: {0}")]
    Header(#[source] csv::Error),
}

/// Rows of a delimited text file, still untyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
    /// Rows the reader could not decode and skipped.
    pub unreadable: usize,
}

/// Parse comma-delimited text whose first line is the header.
///
/// Values and headers are trimmed, LF and CRLF endings both work, and rows
/// may be shorter or longer than the header: missing trailing columns are
/// simply absent from the record and extra values are dropped. Rows where
/// every value is empty are skipped.
pub fn parse_csv(text: &str) -> Result<CsvTable, CsvParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(CsvParseError::Header)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = CsvTable {
        columns,
        ..CsvTable::default()
    };

    for result in reader.records() {
        match result {
            Ok(row) => {
                if row.iter().all(str::is_empty) {
                    continue;
                }
                let record: RawRecord = table
                    .columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter())
                    .collect();
                table.records.push(record);
            }
            Err(err) => {
                log::debug!("skipping unreadable CSV row: {err}");
                table.unreadable += 1;
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_csv("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].get("b"), Some("4"));
        assert_eq!(table.unreadable, 0);
    }

    #[test]
    fn handles_crlf_and_whitespace() {
        let table = parse_csv("time , size\r\n 1 , 2 \r\n").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].get("time"), Some("1"));
        assert_eq!(table.records[0].get("size"), Some("2"));
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let table = parse_csv("a,b,c\n1,2\n").unwrap();
        let row = &table.records[0];
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn extra_values_are_ignored() {
        let table = parse_csv("a\n1,2,3\n").unwrap();
        assert_eq!(table.records[0].len(), 1);
    }

    #[test]
    fn skips_blank_rows() {
        let table = parse_csv("a,b\n1,2\n\n,\n3,4\n").unwrap();
        assert_eq!(table.records.len(), 2);
    }

    #[test]
    fn empty_text_has_no_records() {
        let table = parse_csv("").unwrap();
        assert!(table.records.is_empty());
    }
}
