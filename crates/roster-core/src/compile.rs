//! Roster compilation: regroup classified students by resolved classe.
//!
//! With a filière present, a student is placed under every one of its classes
//! that the filière admits, or under that filière's "classe absent" bucket when
//! none match. Without a filière, each classe code places the student directly;
//! with neither, the student lands in the top-level "filière absent" bucket.
//! A student enrolled in two classes appears in both rosters.

use std::collections::BTreeSet;

use roster_model::{
    ClasseKey, ClassifiedStudent, Code, CompiledRosters, FiliereKey, RosterEntry, RosterKey,
};
use roster_standards::TaxonomyRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{Partition, partition};
use crate::identity::ExclusionList;

/// Whether classe-only exception codes produce roster placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionScope {
    /// Exception codes only affect diagnosis; they never open a classe bucket.
    #[default]
    Exclude,
    /// Exception codes are placed like any filière-less classe.
    Include,
}

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub exception_scope: ExceptionScope,
    pub exclusions: ExclusionList,
}

/// Placements of one student in both mappings.
#[derive(Debug, Default)]
struct Placement {
    flat: BTreeSet<RosterKey>,
    grouped: BTreeSet<(FiliereKey, ClasseKey)>,
}

fn place(codes: &[Code], registry: &TaxonomyRegistry, scope: ExceptionScope) -> Placement {
    let Partition { filieres, mut classes } = partition(codes, registry);
    if scope == ExceptionScope::Exclude {
        classes.retain(|code| !registry.is_classe_only_exception(*code));
    }

    let mut placement = Placement::default();
    if filieres.is_empty() {
        if classes.is_empty() {
            placement.flat.insert(RosterKey::NoFiliere);
            placement
                .grouped
                .insert((FiliereKey::NoFiliere, ClasseKey::NoClasse));
        }
        for classe in &classes {
            placement.flat.insert(RosterKey::Classe(*classe));
            placement
                .grouped
                .insert((FiliereKey::NoFiliere, ClasseKey::Classe(*classe)));
        }
        return placement;
    }

    for filiere in &filieres {
        let admitted = registry.classes_of(*filiere);
        let matched: Vec<Code> = classes
            .iter()
            .copied()
            .filter(|classe| admitted.contains(classe))
            .collect();
        if matched.is_empty() {
            placement.flat.insert(RosterKey::NoClasse);
            placement
                .grouped
                .insert((FiliereKey::Filiere(*filiere), ClasseKey::NoClasse));
        }
        for classe in matched {
            placement.flat.insert(RosterKey::Classe(classe));
            placement
                .grouped
                .insert((FiliereKey::Filiere(*filiere), ClasseKey::Classe(classe)));
        }
    }
    placement
}

/// Build class-keyed rosters from classified students.
///
/// Buckets are sorted by (family name, given name), case-insensitively; equal
/// names keep the order of `students`.
pub fn compile_rosters(
    students: &[ClassifiedStudent],
    registry: &TaxonomyRegistry,
    options: &CompileOptions,
) -> CompiledRosters {
    let mut rosters = CompiledRosters::default();
    for student in students {
        if options.exclusions.contains(&student.record) {
            rosters.excluded += 1;
            continue;
        }
        let placement = place(&student.description.found, registry, options.exception_scope);
        let entry = RosterEntry::from(&student.record);
        for key in placement.flat {
            rosters.by_classe.entry(key).or_default().push(entry.clone());
        }
        for (filiere, classe) in placement.grouped {
            rosters
                .by_filiere
                .entry(filiere)
                .or_default()
                .entry(classe)
                .or_default()
                .push(entry.clone());
        }
    }

    for bucket in rosters.by_classe.values_mut() {
        sort_bucket(bucket);
    }
    for bucket in rosters.by_filiere.values_mut().flat_map(|c| c.values_mut()) {
        sort_bucket(bucket);
    }

    debug!(
        students = students.len(),
        buckets = rosters.by_classe.len(),
        placements = rosters.placement_count(),
        excluded = rosters.excluded,
        "compiled rosters"
    );
    rosters
}

fn sort_bucket(bucket: &mut [RosterEntry]) {
    // Equal names fall back to input order.
    bucket.sort_by_cached_key(|entry| {
        (
            entry.family_name.as_deref().unwrap_or("").to_lowercase(),
            entry.given_name.as_deref().unwrap_or("").to_lowercase(),
            entry.row,
        )
    });
}

#[cfg(test)]
mod tests {
    use roster_standards::TaxonomyRegistry;

    use super::*;

    fn registry() -> TaxonomyRegistry {
        TaxonomyRegistry::builtin().expect("builtin taxonomy")
    }

    fn codes(values: &[u64]) -> Vec<Code> {
        values.iter().copied().map(Code).collect()
    }

    #[test]
    fn consistent_pair_lands_under_its_classe() {
        let placement = place(&codes(&[5016, 5944]), &registry(), ExceptionScope::Exclude);
        assert_eq!(
            placement.flat.into_iter().collect::<Vec<_>>(),
            vec![RosterKey::Classe(Code(5944))]
        );
        assert_eq!(
            placement.grouped.into_iter().collect::<Vec<_>>(),
            vec![(FiliereKey::Filiere(Code(5016)), ClasseKey::Classe(Code(5944)))]
        );
    }

    #[test]
    fn filiere_without_matching_classe_goes_to_classe_absent() {
        let placement = place(&codes(&[5016, 5945]), &registry(), ExceptionScope::Exclude);
        assert_eq!(
            placement.flat.into_iter().collect::<Vec<_>>(),
            vec![RosterKey::NoClasse]
        );
        assert_eq!(
            placement.grouped.into_iter().collect::<Vec<_>>(),
            vec![(FiliereKey::Filiere(Code(5016)), ClasseKey::NoClasse)]
        );
    }

    #[test]
    fn filiere_less_classes_are_placed_directly() {
        let placement = place(&codes(&[5944, 5945]), &registry(), ExceptionScope::Exclude);
        assert_eq!(
            placement.flat.into_iter().collect::<Vec<_>>(),
            vec![RosterKey::Classe(Code(5944)), RosterKey::Classe(Code(5945))]
        );
    }

    #[test]
    fn nothing_resolvable_goes_to_filiere_absent() {
        let placement = place(&codes(&[12]), &registry(), ExceptionScope::Exclude);
        assert_eq!(
            placement.grouped.into_iter().collect::<Vec<_>>(),
            vec![(FiliereKey::NoFiliere, ClasseKey::NoClasse)]
        );
    }

    #[test]
    fn exception_scope_controls_exception_placement() {
        let excluded = place(&codes(&[4538]), &registry(), ExceptionScope::Exclude);
        assert_eq!(
            excluded.flat.into_iter().collect::<Vec<_>>(),
            vec![RosterKey::NoFiliere]
        );
        let included = place(&codes(&[4538]), &registry(), ExceptionScope::Include);
        assert_eq!(
            included.flat.into_iter().collect::<Vec<_>>(),
            vec![RosterKey::Classe(Code(4538))]
        );
    }

    #[test]
    fn equal_names_sort_by_source_row() {
        let entry = |row: usize, family: &str| RosterEntry {
            identifier: None,
            family_name: Some(family.to_string()),
            given_name: Some("Léa".to_string()),
            phone: None,
            row,
        };
        let mut bucket = vec![entry(7, "durand"), entry(2, "Martin"), entry(3, "DURAND")];
        sort_bucket(&mut bucket);
        let rows: Vec<usize> = bucket.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![3, 7, 2]);
    }
}
