use roster_model::{ClasseKey, Code, Diagnosis, FiliereKey, Locale, RosterKey};

#[test]
fn both_ok_variants_render_ok() {
    assert_eq!(Diagnosis::Ok.label(), "OK");
    assert_eq!(Diagnosis::OkClasseOnly.label(), "OK");
    assert!(Diagnosis::OkClasseOnly.is_ok());
    assert!(!Diagnosis::NoFiliere.is_ok());
}

#[test]
fn labels_follow_locale() {
    assert_eq!(Diagnosis::NoFiliere.label_for(Locale::En), "No filière");
    assert_eq!(Diagnosis::NoFiliere.label_for(Locale::Fr), "Pas de filière");
    assert_eq!(
        Diagnosis::Inconsistent.label_for(Locale::Fr),
        "Classe et filière incohérents"
    );
}

#[test]
fn diagnosis_parses_serialized_identifiers() {
    for diagnosis in Diagnosis::ALL {
        let json = serde_json::to_string(&diagnosis).unwrap();
        let parsed: Diagnosis = json.trim_matches('"').parse().unwrap();
        assert_eq!(parsed, diagnosis);
    }
    assert!("bogus".parse::<Diagnosis>().is_err());
}

#[test]
fn sentinel_keys_sort_after_codes() {
    let mut keys = vec![
        RosterKey::NoFiliere,
        RosterKey::Classe(Code(6128)),
        RosterKey::NoClasse,
        RosterKey::Classe(Code(5944)),
    ];
    keys.sort();
    assert_eq!(
        keys,
        vec![
            RosterKey::Classe(Code(5944)),
            RosterKey::Classe(Code(6128)),
            RosterKey::NoClasse,
            RosterKey::NoFiliere,
        ]
    );
    assert!(FiliereKey::Filiere(Code(u64::MAX)) < FiliereKey::NoFiliere);
    assert!(ClasseKey::Classe(Code(u64::MAX)) < ClasseKey::NoClasse);
}

#[test]
fn key_slugs_are_file_names() {
    assert_eq!(RosterKey::Classe(Code(5944)).slug(), "classe_5944");
    assert_eq!(RosterKey::NoClasse.slug(), "sans_classe");
    assert_eq!(FiliereKey::Filiere(Code(5016)).slug(), "filiere_5016");
    assert_eq!(FiliereKey::NoFiliere.slug(), "sans_filiere");
}

#[test]
fn breakdown_by_label_merges_ok_variants() {
    use roster_model::DiagnosisBreakdown;

    let breakdown: DiagnosisBreakdown = [
        Diagnosis::NoFiliere,
        Diagnosis::Ok,
        Diagnosis::OkClasseOnly,
        Diagnosis::Ok,
    ]
    .into_iter()
    .collect();
    assert_eq!(
        breakdown.by_label(Locale::En),
        vec![(Diagnosis::Ok, "OK", 3), (Diagnosis::NoFiliere, "No filière", 1)]
    );
}
