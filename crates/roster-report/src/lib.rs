//! Roster report generation.
//!
//! - **Error list**: `Nom;Prénom;Diagnostic`, one row per flagged student
//! - **Breakdown**: count per diagnosis with a `Total` row
//! - **Rosters**: one CSV per classe bucket, flat or grouped by filière
//! - **JSON**: every augmented record with the taxonomy fingerprint

mod common;
mod csv_export;
mod json_export;

pub use common::{ExportOptions, UTF8_BOM};
pub use csv_export::{
    BREAKDOWN_HEADERS, ERROR_HEADERS, ROSTER_HEADERS, write_breakdown_csv, write_breakdown_file,
    write_error_csv, write_error_file, write_grouped_rosters, write_roster_csv, write_rosters,
};
pub use json_export::{
    BreakdownRow, ExportedStudent, JsonExport, TaxonomyInfo, build_json_export,
    write_json_export,
};
