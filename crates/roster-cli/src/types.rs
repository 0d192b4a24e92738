use std::path::PathBuf;

use roster_core::RosterValidation;
use roster_model::Locale;

/// Outcome of `check` or `compile`, consumed by the summary printer.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    /// Name, version and short fingerprint of the taxonomy used.
    pub taxonomy: String,
    pub locale: Locale,
    pub fail_on_errors: bool,
    pub validation: RosterValidation,
    pub outputs: Vec<PathBuf>,
}

impl RunResult {
    pub fn exit_code(&self) -> i32 {
        if self.fail_on_errors && self.validation.has_errors() {
            1
        } else {
            0
        }
    }
}
