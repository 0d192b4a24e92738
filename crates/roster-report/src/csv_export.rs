//! CSV exports: error list, diagnosis breakdown and roster buckets.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roster_model::{CompiledRosters, DiagnosisBreakdown, ErrorEntry, RosterEntry};
use tracing::debug;

use crate::common::{ExportOptions, create_file, csv_writer, or_empty};

pub const ERROR_HEADERS: [&str; 3] = ["Nom", "Prénom", "Diagnostic"];
pub const ROSTER_HEADERS: [&str; 4] = ["Identifiant", "Nom", "Prénom", "Téléphone"];
pub const BREAKDOWN_HEADERS: [&str; 2] = ["Diagnostic", "Effectif"];

/// Flagged students, three columns.
pub fn write_error_csv<W: Write>(
    out: W,
    errors: &[ErrorEntry],
    options: &ExportOptions,
) -> Result<()> {
    let mut writer = csv_writer(out, options)?;
    writer.write_record(ERROR_HEADERS)?;
    for entry in errors {
        writer.write_record([
            entry.family_name.as_str(),
            entry.given_name.as_str(),
            options.diagnosis_label(entry.diagnosis),
        ])?;
    }
    writer.flush().context("flush error csv")?;
    Ok(())
}

pub fn write_error_file(path: &Path, errors: &[ErrorEntry], options: &ExportOptions) -> Result<()> {
    let file = create_file(path)?;
    write_error_csv(file, errors, options).with_context(|| format!("write {}", path.display()))
}

/// Count per diagnosis label, then a `Total` row equal to the sum.
///
/// Diagnoses sharing a label ("OK") are merged into one row.
pub fn write_breakdown_csv<W: Write>(
    out: W,
    breakdown: &DiagnosisBreakdown,
    options: &ExportOptions,
) -> Result<()> {
    let mut writer = csv_writer(out, options)?;
    writer.write_record(BREAKDOWN_HEADERS)?;
    for (_, label, count) in breakdown.by_label(options.locale) {
        writer.write_record([label, count.to_string().as_str()])?;
    }
    writer.write_record(["Total", breakdown.total().to_string().as_str()])?;
    writer.flush().context("flush breakdown csv")?;
    Ok(())
}

pub fn write_breakdown_file(
    path: &Path,
    breakdown: &DiagnosisBreakdown,
    options: &ExportOptions,
) -> Result<()> {
    let file = create_file(path)?;
    write_breakdown_csv(file, breakdown, options)
        .with_context(|| format!("write {}", path.display()))
}

/// One roster bucket, in bucket order.
pub fn write_roster_csv<W: Write>(
    out: W,
    entries: &[RosterEntry],
    options: &ExportOptions,
) -> Result<()> {
    let mut writer = csv_writer(out, options)?;
    writer.write_record(ROSTER_HEADERS)?;
    for entry in entries {
        writer.write_record([
            or_empty(entry.identifier.as_ref()),
            or_empty(entry.family_name.as_ref()),
            or_empty(entry.given_name.as_ref()),
            or_empty(entry.phone.as_ref()),
        ])?;
    }
    writer.flush().context("flush roster csv")?;
    Ok(())
}

fn write_roster_file(path: &Path, entries: &[RosterEntry], options: &ExportOptions) -> Result<()> {
    let file = create_file(path)?;
    write_roster_csv(file, entries, options).with_context(|| format!("write {}", path.display()))
}

/// One CSV per flat bucket: `classe_<code>.csv`, `sans_classe.csv`, `sans_filiere.csv`.
pub fn write_rosters(
    output_dir: &Path,
    rosters: &CompiledRosters,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let mut outputs = Vec::with_capacity(rosters.by_classe.len());
    for (key, entries) in &rosters.by_classe {
        let path = output_dir.join(format!("{}.csv", key.slug()));
        write_roster_file(&path, entries, options)?;
        outputs.push(path);
    }
    debug!(dir = %output_dir.display(), files = outputs.len(), "wrote rosters");
    Ok(outputs)
}

/// One sub-directory per filière, one CSV per classe inside it.
pub fn write_grouped_rosters(
    output_dir: &Path,
    rosters: &CompiledRosters,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();
    for (filiere, classes) in &rosters.by_filiere {
        let filiere_dir = output_dir.join(filiere.slug());
        for (classe, entries) in classes {
            let path = filiere_dir.join(format!("{}.csv", classe.slug()));
            write_roster_file(&path, entries, options)?;
            outputs.push(path);
        }
    }
    debug!(dir = %output_dir.display(), files = outputs.len(), "wrote grouped rosters");
    Ok(outputs)
}
