//! Full validation pass over an ingested roster.

use roster_model::{
    ClassifiedStudent, CompiledRosters, DiagnosisBreakdown, ErrorEntry, StudentRecord,
};
use roster_standards::TaxonomyRegistry;
use tracing::{debug, info, info_span, warn};

use crate::classify::{ClassifierOptions, classify_record};
use crate::compile::{CompileOptions, compile_rosters};

/// Options for a full validation pass.
#[derive(Debug, Clone, Default)]
pub struct RosterOptions {
    pub classifier: ClassifierOptions,
    pub compile: CompileOptions,
}

/// Everything one pass produces: augmented records, counts, flagged students
/// and compiled rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterValidation {
    pub students: Vec<ClassifiedStudent>,
    pub breakdown: DiagnosisBreakdown,
    pub errors: Vec<ErrorEntry>,
    pub rosters: CompiledRosters,
}

impl RosterValidation {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn classify_records(
    records: Vec<StudentRecord>,
    registry: &TaxonomyRegistry,
    options: ClassifierOptions,
) -> Vec<ClassifiedStudent> {
    records
        .into_iter()
        .map(|record| classify_record(record, registry, options))
        .collect()
}

/// Students whose diagnosis is not OK, in input order.
pub fn error_list(students: &[ClassifiedStudent]) -> Vec<ErrorEntry> {
    students
        .iter()
        .filter(|student| !student.diagnosis.is_ok())
        .map(ErrorEntry::from)
        .collect()
}

/// Classify every record, then compile rosters.
pub fn validate_roster(
    records: Vec<StudentRecord>,
    registry: &TaxonomyRegistry,
    options: &RosterOptions,
) -> RosterValidation {
    let span = info_span!(
        "roster",
        taxonomy = registry.name(),
        version = registry.version(),
        records = records.len()
    );
    let _guard = span.enter();

    let students = classify_records(records, registry, options.classifier);
    let breakdown: DiagnosisBreakdown = students.iter().map(|s| s.diagnosis).collect();
    for (diagnosis, count) in breakdown.iter() {
        debug!(diagnosis = diagnosis.label(), count, "diagnosis count");
    }

    let errors = error_list(&students);
    if !errors.is_empty() {
        warn!(
            flagged = errors.len(),
            total = breakdown.total(),
            "students with enrollment errors"
        );
    }

    let rosters = compile_rosters(&students, registry, &options.compile);
    info!(
        students = students.len(),
        ok = breakdown.ok_count(),
        flagged = errors.len(),
        buckets = rosters.by_classe.len(),
        excluded = rosters.excluded,
        "roster validated"
    );

    RosterValidation {
        students,
        breakdown,
        errors,
        rosters,
    }
}
