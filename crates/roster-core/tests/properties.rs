use proptest::prelude::*;

use roster_core::{
    ClassifierOptions, ConsistencyPolicy, RosterOptions, classify_with, describe, extract_codes,
    validate_roster,
};
use roster_model::{ClasseKey, Code, Diagnosis, FiliereKey, RosterKey, StudentRecord};
use roster_standards::TaxonomyRegistry;

fn registry() -> TaxonomyRegistry {
    TaxonomyRegistry::builtin().expect("builtin taxonomy")
}

/// Registered codes mixed with arbitrary ones, so most sequences hit the table.
fn arb_code() -> impl Strategy<Value = u64> {
    let registry = registry();
    let pool: Vec<u64> = registry
        .filieres()
        .chain(registry.classes())
        .map(|(code, _)| code.value())
        .collect();
    prop_oneof![
        3 => prop::sample::select(pool),
        1 => 0u64..10_000,
    ]
}

fn arb_cell() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        (
            prop::collection::vec(arb_code(), 0..6),
            prop::sample::select(vec![" ", ", ", ";", " / ", "-", "x"]),
        )
            .prop_map(|(codes, sep)| {
                codes
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(sep)
            }),
    )
}

fn arb_records() -> impl Strategy<Value = Vec<StudentRecord>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["Durand", "durand", "Martin", "Élie", "Bernard"]),
            prop::sample::select(vec!["Léa", "lea", "Paul", "Inès"]),
            arb_cell(),
        ),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(row, (family, given, cell))| {
                let record = StudentRecord::new(row).with_names(family, given);
                match cell {
                    Some(cell) => record.with_codes(&cell),
                    None => record,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn classification_is_total(codes in prop::collection::vec(any::<u64>(), 0..12)) {
        let registry = registry();
        let codes: Vec<Code> = codes.into_iter().map(Code).collect();
        for consistency in [ConsistencyPolicy::Membership, ConsistencyPolicy::LabelEquality] {
            let diagnosis = classify_with(&codes, &registry, ClassifierOptions { consistency });
            prop_assert!(Diagnosis::ALL.contains(&diagnosis));
        }
    }

    #[test]
    fn known_and_unknown_partition_the_sequence(cell in arb_cell()) {
        let registry = registry();
        let codes = extract_codes(cell.as_deref());
        let description = describe(&codes, &registry);
        prop_assert_eq!(description.known.len() + description.unknown.len(), codes.len());
        prop_assert!(description.known.iter().all(|code| registry.is_known(*code)));
        prop_assert!(description.unknown.iter().all(|code| !registry.is_known(*code)));
        let rebuilt: Vec<Code> = codes
            .iter()
            .copied()
            .filter(|code| registry.is_known(*code))
            .collect();
        prop_assert_eq!(rebuilt, description.known);
    }

    #[test]
    fn pipeline_is_idempotent(records in arb_records()) {
        let registry = registry();
        let options = RosterOptions::default();
        let first = validate_roster(records.clone(), &registry, &options);
        let second = validate_roster(records, &registry, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ok_students_land_in_their_pair_bucket(records in arb_records()) {
        let registry = registry();
        let validation = validate_roster(records, &registry, &RosterOptions::default());
        for student in &validation.students {
            if student.diagnosis != Diagnosis::Ok {
                continue;
            }
            let filiere = student
                .description
                .found
                .iter()
                .copied()
                .find(|code| registry.is_filiere(*code));
            let classe = student
                .description
                .found
                .iter()
                .copied()
                .find(|code| registry.is_classe(*code));
            let (Some(filiere), Some(classe)) = (filiere, classe) else {
                prop_assert!(false, "OK student without a pair");
                continue;
            };
            let row = student.record.row;
            prop_assert!(validation
                .rosters
                .bucket(RosterKey::Classe(classe))
                .iter()
                .any(|entry| entry.row == row));
            prop_assert!(validation
                .rosters
                .grouped_bucket(FiliereKey::Filiere(filiere), ClasseKey::Classe(classe))
                .iter()
                .any(|entry| entry.row == row));
        }
    }

    #[test]
    fn breakdown_total_equals_student_count(records in arb_records()) {
        let registry = registry();
        let count = records.len();
        let validation = validate_roster(records, &registry, &RosterOptions::default());
        prop_assert_eq!(validation.breakdown.total(), count);
        prop_assert_eq!(validation.errors.len(), validation.breakdown.error_count());
    }
}
