pub mod csv_table;

pub use csv_table::{CsvParseError, CsvTable, parse_csv};
