//! CSV import/export for guarantee records.
//!
//! The format is deliberately simple and matches what spreadsheet users
//! produce by hand:
//!
//! - the first line is a header; its cell count fixes the expected width of
//!   every data line, and lines of any other width are skipped;
//! - cells are comma-separated and may be wrapped in double quotes so that
//!   they can contain commas;
//! - embedded quote characters are never escaped, so a cell that itself
//!   contains `"` does not survive an export/import cycle;
//! - exported text starts with a UTF-8 byte-order mark so spreadsheet tools
//!   pick the right encoding for the Arabic headers.
//!
//! Columns are read by position, in the order of [`TEMPLATE_HEADERS`].

mod export;
mod parse;
mod tokenizer;

pub use export::{export_guarantees, template_csv, EXPORT_HEADERS, TEMPLATE_HEADERS};
pub use parse::{classify_status, parse_guarantees, RowDraft};
pub use tokenizer::{clean_value, split_line};

/// Byte-order mark prepended to every generated file.
pub const BOM: char = '\u{feff}';

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "bank_guarantees.csv";

/// Suggested file name for the import template.
pub const TEMPLATE_FILE_NAME: &str = "bank_guarantees_template.csv";
