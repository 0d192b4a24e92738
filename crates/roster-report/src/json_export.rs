//! Full JSON export of augmented records.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use roster_model::{ClassifiedStudent, Code, Diagnosis, DiagnosisBreakdown};
use roster_standards::TaxonomyRegistry;
use serde::Serialize;

use crate::common::{ExportOptions, create_file};

#[derive(Debug, Serialize)]
pub struct TaxonomyInfo<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub fingerprint: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BreakdownRow {
    pub diagnosis: Diagnosis,
    pub label: &'static str,
    pub count: usize,
}

/// One student as exported: identity, raw cell and derived fields.
#[derive(Debug, Serialize)]
pub struct ExportedStudent<'a> {
    pub row: usize,
    pub identifier: Option<&'a str>,
    pub family_name: Option<&'a str>,
    pub given_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub codes: Option<&'a str>,
    #[serde(skip_serializing_if = "no_extra")]
    pub extra: &'a BTreeMap<String, String>,
    pub diagnosis: Diagnosis,
    pub diagnosis_label: &'static str,
    pub found: &'a [Code],
    pub known: &'a [Code],
    pub unknown: &'a [Code],
    pub filiere_label: Option<&'a str>,
    pub classe_label: Option<&'a str>,
}

fn no_extra(extra: &&BTreeMap<String, String>) -> bool {
    extra.is_empty()
}

impl<'a> ExportedStudent<'a> {
    fn new(student: &'a ClassifiedStudent, options: &ExportOptions) -> Self {
        let record = &student.record;
        let description = &student.description;
        Self {
            row: record.row,
            identifier: record.identifier.as_deref(),
            family_name: record.family_name.as_deref(),
            given_name: record.given_name.as_deref(),
            phone: record.phone.as_deref(),
            codes: record.codes.as_deref(),
            extra: &record.extra,
            diagnosis: student.diagnosis,
            diagnosis_label: options.diagnosis_label(student.diagnosis),
            found: &description.found,
            known: &description.known,
            unknown: &description.unknown,
            filiere_label: description.filiere_label.as_deref(),
            classe_label: description.classe_label.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonExport<'a> {
    pub generated_at: String,
    pub taxonomy: TaxonomyInfo<'a>,
    pub total: usize,
    pub breakdown: Vec<BreakdownRow>,
    pub students: Vec<ExportedStudent<'a>>,
}

pub fn build_json_export<'a>(
    students: &'a [ClassifiedStudent],
    breakdown: &DiagnosisBreakdown,
    registry: &'a TaxonomyRegistry,
    options: &ExportOptions,
    generated_at: String,
) -> JsonExport<'a> {
    JsonExport {
        generated_at,
        taxonomy: TaxonomyInfo {
            name: registry.name(),
            version: registry.version(),
            fingerprint: registry.fingerprint(),
        },
        total: breakdown.total(),
        breakdown: breakdown
            .iter()
            .map(|(diagnosis, count)| BreakdownRow {
                diagnosis,
                label: options.diagnosis_label(diagnosis),
                count,
            })
            .collect(),
        students: students
            .iter()
            .map(|student| ExportedStudent::new(student, options))
            .collect(),
    }
}

/// Write the pretty-printed export, stamped with the current UTC time.
pub fn write_json_export(
    path: &Path,
    students: &[ClassifiedStudent],
    breakdown: &DiagnosisBreakdown,
    registry: &TaxonomyRegistry,
    options: &ExportOptions,
) -> Result<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let export = build_json_export(students, breakdown, registry, options, timestamp);
    let mut file = create_file(path)?;
    serde_json::to_writer_pretty(&mut file, &export)
        .with_context(|| format!("write {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
