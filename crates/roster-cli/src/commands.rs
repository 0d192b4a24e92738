use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{debug, info, info_span, trace};

use roster_cli::config::{RosterConfig, ascii_delimiter};
use roster_cli::logging::{redact_optional, redact_value};
use roster_core::{
    ConsistencyPolicy, ExceptionScope, ExclusionList, RosterOptions, RosterValidation,
    validate_roster,
};
use roster_ingest::{ColumnRef, IngestOptions, read_roster};
use roster_model::Locale;
use roster_report::{
    ExportOptions, write_breakdown_file, write_error_file, write_grouped_rosters,
    write_json_export, write_rosters,
};
use roster_standards::{DoctorReport, TaxonomyRegistry};

use crate::cli::{CheckArgs, CompileArgs, ConsistencyArg, InputArgs, LocaleArg, TaxonomyArgs};
use crate::summary::apply_table_style;
use crate::types::RunResult;

/// Error list file written next to compiled rosters.
const ERRORS_FILE_NAME: &str = "erreurs_groupes.csv";

/// Settings resolved from the config file, then command-line overrides.
struct Settings {
    ingest: IngestOptions,
    roster: RosterOptions,
    export: ExportOptions,
}

fn resolve_settings(args: &InputArgs) -> Result<Settings> {
    let config = RosterConfig::load_or_default(args.config.as_deref())?;
    let mut ingest = config.ingest_options()?;
    let mut roster = config.roster_options();
    let mut export = config.export_options()?;

    if let Some(column) = &args.codes_column {
        ingest.codes_column = column.parse::<ColumnRef>()?;
    }
    if let Some(row) = args.header_row {
        ingest.header_row = row;
    }
    if let Some(row) = args.data_start_row {
        ingest.data_start_row = row;
    }
    if let Some(column) = &args.family_name_column {
        ingest.family_name_column = Some(column.parse::<ColumnRef>()?);
    }
    if let Some(column) = &args.given_name_column {
        ingest.given_name_column = Some(column.parse::<ColumnRef>()?);
    }
    if let Some(delimiter) = args.delimiter {
        ingest.delimiter = ascii_delimiter(delimiter)?;
    }
    if let Some(consistency) = args.consistency {
        roster.classifier.consistency = match consistency {
            ConsistencyArg::Membership => ConsistencyPolicy::Membership,
            ConsistencyArg::LabelEquality => ConsistencyPolicy::LabelEquality,
        };
    }
    if let Some(locale) = args.locale {
        export.locale = match locale {
            LocaleArg::Fr => Locale::Fr,
            LocaleArg::En => Locale::En,
        };
    }
    Ok(Settings {
        ingest,
        roster,
        export,
    })
}

fn load_registry() -> Result<TaxonomyRegistry> {
    let registry = TaxonomyRegistry::builtin().context("load built-in taxonomy")?;
    debug!(
        name = registry.name(),
        version = registry.version(),
        fingerprint = registry.fingerprint(),
        "taxonomy loaded"
    );
    Ok(registry)
}

fn validate_input(
    input: &Path,
    settings: &Settings,
    registry: &TaxonomyRegistry,
) -> Result<RosterValidation> {
    let table = read_roster(input, &settings.ingest)
        .with_context(|| format!("read roster {}", input.display()))?;
    info!(records = table.records.len(), "roster read");
    let validation = validate_roster(table.records, registry, &settings.roster);
    for student in validation.students.iter().filter(|s| !s.diagnosis.is_ok()) {
        trace!(
            row = student.record.row + 1,
            family_name = redact_optional(student.record.family_name.as_deref()),
            given_name = redact_optional(student.record.given_name.as_deref()),
            codes = redact_optional(student.record.codes.as_deref()),
            diagnosis = student.diagnosis.label(),
            "flagged student"
        );
    }
    Ok(validation)
}

pub fn run_check(args: &CheckArgs) -> Result<RunResult> {
    let input = &args.input.input;
    let span = info_span!("check", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let settings = resolve_settings(&args.input)?;
    let registry = load_registry()?;
    let validation = validate_input(input, &settings, &registry)?;

    let mut outputs = Vec::new();
    if let Some(path) = &args.errors {
        write_error_file(path, &validation.errors, &settings.export)?;
        outputs.push(path.clone());
    }
    if let Some(path) = &args.breakdown {
        write_breakdown_file(path, &validation.breakdown, &settings.export)?;
        outputs.push(path.clone());
    }
    if let Some(path) = &args.json {
        write_json_export(
            path,
            &validation.students,
            &validation.breakdown,
            &registry,
            &settings.export,
        )?;
        outputs.push(path.clone());
    }
    info!(
        outputs = outputs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "check finished"
    );

    Ok(RunResult {
        input: input.clone(),
        taxonomy: taxonomy_line(&registry),
        locale: settings.export.locale,
        fail_on_errors: args.fail_on_errors,
        validation,
        outputs,
    })
}

/// Parse `--exclude` values of the form `Family,Given`.
fn parse_exclusions(values: &[String]) -> Result<Vec<(String, String)>> {
    values
        .iter()
        .map(|value| match value.split_once(',') {
            Some((family, given)) if !family.trim().is_empty() || !given.trim().is_empty() => {
                Ok((family.trim().to_string(), given.trim().to_string()))
            }
            _ => bail!("invalid --exclude value {value:?}: expected \"Family,Given\""),
        })
        .collect()
}

pub fn run_compile(args: &CompileArgs) -> Result<RunResult> {
    let input = &args.input.input;
    let span = info_span!("compile", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut settings = resolve_settings(&args.input)?;
    if args.include_exceptions {
        settings.roster.compile.exception_scope = ExceptionScope::Include;
    }
    let exclusions = parse_exclusions(&args.exclude)?;
    extend_exclusions(&mut settings.roster.compile.exclusions, &exclusions);
    debug!(
        exclusions = settings.roster.compile.exclusions.len(),
        "exclusion list ready"
    );

    let registry = load_registry()?;
    let validation = validate_input(input, &settings, &registry)?;

    let mut outputs: Vec<PathBuf> = if args.grouped {
        write_grouped_rosters(&args.output_dir, &validation.rosters, &settings.export)?
    } else {
        write_rosters(&args.output_dir, &validation.rosters, &settings.export)?
    };
    if args.with_errors {
        let path = args.output_dir.join(ERRORS_FILE_NAME);
        write_error_file(&path, &validation.errors, &settings.export)?;
        outputs.push(path);
    }
    info!(
        dir = %args.output_dir.display(),
        files = outputs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "rosters written"
    );

    Ok(RunResult {
        input: input.clone(),
        taxonomy: taxonomy_line(&registry),
        locale: settings.export.locale,
        fail_on_errors: false,
        validation,
        outputs,
    })
}

fn extend_exclusions(list: &mut ExclusionList, extra: &[(String, String)]) {
    for (family, given) in extra {
        if !list.insert(family, given) {
            debug!(
                family_name = redact_value(family),
                given_name = redact_value(given),
                "exclusion already listed"
            );
        }
    }
}

fn taxonomy_line(registry: &TaxonomyRegistry) -> String {
    let fingerprint = registry.fingerprint();
    let short = fingerprint.get(..12).unwrap_or(fingerprint);
    format!("{} {} ({short})", registry.name(), registry.version())
}

pub fn run_taxonomy(args: &TaxonomyArgs) -> Result<()> {
    let registry = match &args.validate {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            TaxonomyRegistry::from_toml_str(&contents)
                .with_context(|| format!("invalid taxonomy {}", path.display()))?
        }
        None => load_registry()?,
    };

    if args.doctor {
        let report = DoctorReport::from_registry(&registry);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Taxonomy: {}", taxonomy_line(&registry));
    let mut table = Table::new();
    table.set_header(vec!["Filière", "Label", "Classes"]);
    apply_table_style(&mut table);
    for (code, label) in registry.filieres() {
        let classes: Vec<String> = registry
            .classes_of(code)
            .iter()
            .map(ToString::to_string)
            .collect();
        let classes = if classes.is_empty() {
            "-".to_string()
        } else {
            classes.join(", ")
        };
        table.add_row(vec![code.to_string(), label.to_string(), classes]);
    }
    println!("{table}");

    let exceptions: Vec<String> = registry
        .classe_only_exceptions()
        .iter()
        .map(|code| match registry.classe_label(*code) {
            Some(label) => format!("{code} ({label})"),
            None => code.to_string(),
        })
        .collect();
    if !exceptions.is_empty() {
        println!("Classe-only exceptions: {}", exceptions.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusions_need_a_comma() {
        let parsed = parse_exclusions(&["Lefèvre, Zoé".to_string()]).unwrap();
        assert_eq!(parsed, vec![("Lefèvre".to_string(), "Zoé".to_string())]);
        assert!(parse_exclusions(&["Lefèvre".to_string()]).is_err());
        assert!(parse_exclusions(&[" , ".to_string()]).is_err());
    }
}
