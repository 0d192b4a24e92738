//! Diagnostic classification of a student's code sequence.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. no filière and no classe: [`Diagnosis::NoClasseNoFiliere`]
//! 2. classes only: OK when a classe-only exception code is present,
//!    otherwise [`Diagnosis::NoFiliere`]
//! 3. filières only: [`Diagnosis::NoClasse`]
//! 4. several filières and several classes, then several filières, then
//!    several classes
//! 5. one filière and one classe: OK when consistent under the selected
//!    [`ConsistencyPolicy`], otherwise [`Diagnosis::Inconsistent`]
//!
//! Counts are over distinct codes, so a repeated code is never "multiple".
//! Unknown codes are ignored for diagnosis. Classification is total.

use roster_model::{ClassifiedStudent, Code, CodeDescription, Diagnosis, StudentRecord};
use roster_standards::TaxonomyRegistry;
use serde::{Deserialize, Serialize};

use crate::extract::extract_codes;

/// How a single filière/classe pair is judged consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// The classe is listed by the filière.
    #[default]
    Membership,
    /// The filière's display name equals the display name of one of the
    /// classe's owning filières. Kept for legacy fixtures.
    LabelEquality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierOptions {
    #[serde(default)]
    pub consistency: ConsistencyPolicy,
}

/// Distinct registered codes of each kind, in first-appearance order.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    pub filieres: Vec<Code>,
    pub classes: Vec<Code>,
}

pub(crate) fn partition(codes: &[Code], registry: &TaxonomyRegistry) -> Partition {
    let mut partition = Partition::default();
    for &code in codes {
        let bucket = if registry.is_filiere(code) {
            &mut partition.filieres
        } else if registry.is_classe(code) {
            &mut partition.classes
        } else {
            continue;
        };
        if !bucket.contains(&code) {
            bucket.push(code);
        }
    }
    partition
}

/// Classify with the default (membership) policy.
pub fn classify(codes: &[Code], registry: &TaxonomyRegistry) -> Diagnosis {
    classify_with(codes, registry, ClassifierOptions::default())
}

pub fn classify_with(
    codes: &[Code],
    registry: &TaxonomyRegistry,
    options: ClassifierOptions,
) -> Diagnosis {
    let Partition { filieres, classes } = partition(codes, registry);
    // Any exception code in the raw sequence counts, not only in the classe partition.
    let has_exception = codes
        .iter()
        .any(|code| registry.is_classe_only_exception(*code));

    match (filieres.as_slice(), classes.as_slice()) {
        ([], []) => Diagnosis::NoClasseNoFiliere,
        ([], _) if has_exception => Diagnosis::OkClasseOnly,
        ([], _) => Diagnosis::NoFiliere,
        (_, []) => Diagnosis::NoClasse,
        ([_, _, ..], [_, _, ..]) => Diagnosis::MultipleFilieresAndClasses,
        ([_, _, ..], _) => Diagnosis::MultipleFilieres,
        (_, [_, _, ..]) => Diagnosis::MultipleClasses,
        ([filiere], [classe]) => {
            if is_consistent(*filiere, *classe, registry, options.consistency) {
                Diagnosis::Ok
            } else {
                Diagnosis::Inconsistent
            }
        }
    }
}

fn is_consistent(
    filiere: Code,
    classe: Code,
    registry: &TaxonomyRegistry,
    policy: ConsistencyPolicy,
) -> bool {
    match policy {
        ConsistencyPolicy::Membership => registry.classes_of(filiere).contains(&classe),
        ConsistencyPolicy::LabelEquality => {
            let Some(label) = registry.filiere_label(filiere) else {
                return false;
            };
            registry
                .filieres_of(classe)
                .iter()
                .any(|owner| registry.filiere_label(*owner) == Some(label))
        }
    }
}

/// Known/unknown split and single-code labels for a code sequence.
pub fn describe(codes: &[Code], registry: &TaxonomyRegistry) -> CodeDescription {
    let (known, unknown): (Vec<Code>, Vec<Code>) =
        codes.iter().partition(|code| registry.is_known(**code));
    let Partition { filieres, classes } = partition(codes, registry);
    let filiere_label = match filieres.as_slice() {
        [code] => registry
            .filiere_label(*code)
            .map(|label| format!("{label} ({code})")),
        _ => None,
    };
    let classe_label = match classes.as_slice() {
        [code] => registry
            .classe_label(*code)
            .map(|label| format!("{label} ({code})")),
        _ => None,
    };
    CodeDescription {
        found: codes.to_vec(),
        known,
        unknown,
        filiere_label,
        classe_label,
    }
}

/// Extract, classify and describe one record.
pub fn classify_record(
    record: StudentRecord,
    registry: &TaxonomyRegistry,
    options: ClassifierOptions,
) -> ClassifiedStudent {
    let codes = extract_codes(record.codes.as_deref());
    let diagnosis = classify_with(&codes, registry, options);
    let description = describe(&codes, registry);
    ClassifiedStudent {
        record,
        diagnosis,
        description,
    }
}

#[cfg(test)]
mod tests {
    use roster_standards::TaxonomyTable;

    use super::*;

    fn codes(values: &[u64]) -> Vec<Code> {
        values.iter().copied().map(Code).collect()
    }

    fn builtin() -> TaxonomyRegistry {
        TaxonomyRegistry::builtin().expect("builtin taxonomy")
    }

    #[test]
    fn ordering_of_multiple_rules() {
        let registry = builtin();
        assert_eq!(
            classify(&codes(&[5016, 5019, 5944, 5945]), &registry),
            Diagnosis::MultipleFilieresAndClasses
        );
        assert_eq!(
            classify(&codes(&[5016, 5017, 5944]), &registry),
            Diagnosis::MultipleFilieres
        );
        assert_eq!(
            classify(&codes(&[5016, 5943, 5944]), &registry),
            Diagnosis::MultipleClasses
        );
    }

    #[test]
    fn duplicates_are_not_multiple() {
        let registry = builtin();
        assert_eq!(
            classify(&codes(&[5016, 5944, 5016, 5944]), &registry),
            Diagnosis::Ok
        );
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let registry = builtin();
        assert_eq!(
            classify(&codes(&[1, 5016, 77777, 5944]), &registry),
            Diagnosis::Ok
        );
        assert_eq!(classify(&codes(&[1, 2, 3]), &registry), Diagnosis::NoClasseNoFiliere);
    }

    #[test]
    fn exception_spares_other_classes_without_filiere() {
        let registry = builtin();
        assert_eq!(
            classify(&codes(&[5944, 4538]), &registry),
            Diagnosis::OkClasseOnly
        );
    }

    #[test]
    fn exception_does_not_rescue_a_filiere() {
        let registry = builtin();
        assert_eq!(
            classify(&codes(&[5016, 4538]), &registry),
            Diagnosis::Inconsistent
        );
    }

    #[test]
    fn policies_diverge_on_shared_labels() {
        // Two filières named alike; only one of them lists the classe.
        let table = TaxonomyTable::new("t", "1")
            .with_filiere(1, "Same", &[10])
            .with_filiere(2, "Same", &[])
            .with_classe(10, "Same");
        let registry = TaxonomyRegistry::from_table(&table).unwrap();
        let pair = codes(&[2, 10]);
        assert_eq!(classify(&pair, &registry), Diagnosis::Inconsistent);
        let legacy = ClassifierOptions {
            consistency: ConsistencyPolicy::LabelEquality,
        };
        assert_eq!(classify_with(&pair, &registry, legacy), Diagnosis::Ok);
    }

    #[test]
    fn labels_need_exactly_one_distinct_code() {
        let registry = builtin();
        let single = describe(&codes(&[5016, 5016, 5944]), &registry);
        assert_eq!(single.filiere_label.as_deref(), Some("USPN (5016)"));
        assert_eq!(single.classe_label.as_deref(), Some("USPN (5944)"));

        let multiple = describe(&codes(&[5016, 5017]), &registry);
        assert_eq!(multiple.filiere_label, None);
        assert_eq!(multiple.classe_label, None);
    }
}
