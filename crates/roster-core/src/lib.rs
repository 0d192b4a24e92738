//! Code classification and roster compilation.
//!
//! Every operation here is total: data-quality problems come back as
//! diagnoses and sentinel buckets, never as errors. The only fatal failures
//! belong to registry construction in `roster-standards`.

pub mod classify;
pub mod compile;
pub mod extract;
pub mod identity;
pub mod pipeline;

pub use classify::{
    ClassifierOptions, ConsistencyPolicy, classify, classify_record, classify_with, describe,
};
pub use compile::{CompileOptions, ExceptionScope, compile_rosters};
pub use extract::extract_codes;
pub use identity::{ExclusionList, Identity, normalize_name};
pub use pipeline::{
    RosterOptions, RosterValidation, classify_records, error_list, validate_roster,
};
