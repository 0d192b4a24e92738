use std::fs;

use roster_ingest::{ColumnRef, IngestError, IngestOptions, read_roster};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write roster");
    path
}

#[test]
fn reads_semicolon_roster_with_bom_and_duplicate_headers() {
    let dir = TempDir::new().expect("temp dir");
    let contents = "\u{feff}titre;;;\n;;;\nNom;Prénom;Nom;Groupes\n  Durand ; Léa ;X; 5016 5944 \n";
    let path = write(&dir, "roster.csv", contents);
    let options = IngestOptions {
        codes_column: ColumnRef::name("Groupes"),
        delimiter: b';',
        ..IngestOptions::default()
    };
    let table = read_roster(&path, &options).expect("read roster");
    assert_eq!(table.headers, vec!["Nom", "Prénom", "Nom.1", "Groupes"]);
    let record = &table.records[0];
    assert_eq!(record.family_name.as_deref(), Some("Durand"));
    assert_eq!(record.given_name.as_deref(), Some("Léa"));
    assert_eq!(record.codes.as_deref(), Some("5016 5944"));
    assert_eq!(record.extra.get("Nom.1").map(String::as_str), Some("X"));
}

#[test]
fn explicit_columns_override_detection() {
    let dir = TempDir::new().expect("temp dir");
    let contents = "a,b,c\nx,y,z\nNom,Prénom,Codes\nDurand,Léa,5944\n";
    let path = write(&dir, "roster.csv", contents);
    let options = IngestOptions {
        codes_column: ColumnRef::letter("C"),
        family_name_column: Some(ColumnRef::letter("B")),
        given_name_column: Some(ColumnRef::letter("A")),
        ..IngestOptions::default()
    };
    let table = read_roster(&path, &options).expect("read roster");
    let record = &table.records[0];
    assert_eq!(record.family_name.as_deref(), Some("Léa"));
    assert_eq!(record.given_name.as_deref(), Some("Durand"));
}

#[test]
fn empty_header_cells_get_positional_names() {
    let dir = TempDir::new().expect("temp dir");
    let contents = ",\nNom,,Groupes\nDurand,note,5944,extra\n";
    let path = write(&dir, "roster.csv", contents);
    let options = IngestOptions {
        codes_column: ColumnRef::letter("C"),
        header_row: 2,
        data_start_row: 3,
        ..IngestOptions::default()
    };
    let table = read_roster(&path, &options).expect("read roster");
    assert_eq!(table.headers, vec!["Nom", "COL_B", "Groupes", "COL_D"]);
    assert_eq!(table.records[0].extra.get("COL_D").map(String::as_str), Some("extra"));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = read_roster(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn unknown_named_column_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "roster.csv", "a\nb\nNom\nDurand\n");
    let options = IngestOptions {
        codes_column: ColumnRef::name("Groupes"),
        ..IngestOptions::default()
    };
    let err = read_roster(&path, &options).unwrap_err();
    assert!(matches!(err, IngestError::UnknownColumn { name } if name == "Groupes"));
}

#[test]
fn uppercase_header_names_select_columns() {
    let dir = TempDir::new().expect("temp dir");
    let contents = "ID,NOM,PRENOM,Groupes\nE7,Durand,Léa,5016 5944\n";
    let path = write(&dir, "roster.csv", contents);
    let options = IngestOptions {
        codes_column: ColumnRef::name("Groupes"),
        family_name_column: Some("NOM".parse().expect("column ref")),
        given_name_column: Some("PRENOM".parse().expect("column ref")),
        identifier_column: Some("ID".parse().expect("column ref")),
        header_row: 1,
        data_start_row: 2,
        ..IngestOptions::default()
    };
    let table = read_roster(&path, &options).expect("read roster");
    assert_eq!(table.columns.family_name, Some(1));
    let record = &table.records[0];
    assert_eq!(record.family_name.as_deref(), Some("Durand"));
    assert_eq!(record.given_name.as_deref(), Some("Léa"));
    assert_eq!(record.identifier.as_deref(), Some("E7"));
}
