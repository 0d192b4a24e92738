pub mod columns;
pub mod error;
pub mod reader;

pub use columns::{
    ColumnRef, column_index_to_letter, column_letter_to_index, detect_identifier_column,
    detect_name_columns, detect_phone_column, make_unique_headers,
};
pub use error::{IngestError, Result};
pub use reader::{IngestOptions, RosterColumns, RosterTable, parse_roster, read_roster};
