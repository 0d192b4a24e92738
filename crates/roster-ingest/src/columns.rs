//! Column addressing and header handling.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Convert a spreadsheet column letter (`"A"`, `"I"`, `"AA"`) to a 0-based index.
pub fn column_letter_to_index(letter: &str) -> Result<usize> {
    let letter = letter.trim();
    let invalid = || IngestError::InvalidColumnLetter {
        value: letter.to_string(),
    };
    if letter.is_empty() {
        return Err(invalid());
    }
    let mut total: usize = 0;
    for ch in letter.chars() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return Err(invalid());
        }
        let digit = usize::from(ch as u8 - b'A') + 1;
        total = total
            .checked_mul(26)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    Ok(total - 1)
}

/// Spreadsheet letter for a 0-based column index.
pub fn column_index_to_letter(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Suffix repeated headers with `.1`, `.2`, ... in order of appearance.
pub fn make_unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    headers
        .iter()
        .map(|header| {
            let count = seen.entry(header.as_str()).or_insert(0);
            let unique = if *count == 0 {
                header.clone()
            } else {
                format!("{header}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

const GIVEN_NAME_KEYS: &[&str] = &["prénom", "prenom", "first name"];
const FAMILY_NAME_KEYS: &[&str] = &["nom", "last name"];
const PHONE_KEYS: &[&str] = &["téléphone", "telephone", "phone", "portable", "mobile"];
const PHONE_WORDS: &[&str] = &["tel", "tél", "tel.", "tél."];
const IDENTIFIER_KEYS: &[&str] = &[
    "identifiant",
    "matricule",
    "student id",
    "numéro étudiant",
    "numero etudiant",
];
const IDENTIFIER_WORDS: &[&str] = &["id", "ine"];

fn lowered(header: &str) -> String {
    header.trim().to_lowercase()
}

fn has_key(header: &str, keys: &[&str]) -> bool {
    keys.iter().any(|key| header.contains(key))
}

fn has_word(header: &str, words: &[&str]) -> bool {
    header
        .split(|ch: char| !ch.is_alphanumeric() && ch != '.')
        .any(|part| words.contains(&part))
}

/// Pick the family-name and given-name columns by header keyword.
///
/// Given-name headers also contain "nom", so they are never picked as the
/// family-name column.
pub fn detect_name_columns(headers: &[String]) -> (Option<usize>, Option<usize>) {
    let lowered: Vec<String> = headers.iter().map(|h| lowered(h)).collect();
    let given = lowered.iter().position(|h| has_key(h, GIVEN_NAME_KEYS));
    let family = lowered
        .iter()
        .position(|h| has_key(h, FAMILY_NAME_KEYS) && !has_key(h, GIVEN_NAME_KEYS));
    (family, given)
}

pub fn detect_phone_column(headers: &[String]) -> Option<usize> {
    headers.iter().map(|h| lowered(h)).position(|h| {
        has_key(&h, PHONE_KEYS) || has_word(&h, PHONE_WORDS)
    })
}

pub fn detect_identifier_column(headers: &[String]) -> Option<usize> {
    headers.iter().map(|h| lowered(h)).position(|h| {
        has_key(&h, IDENTIFIER_KEYS) || has_word(&h, IDENTIFIER_WORDS)
    })
}

/// A column given either by spreadsheet letter or by header name.
///
/// One to three uppercase ASCII letters read as a letter (`"I"`, `"AB"`);
/// anything else is a header name (`"Nom"`, `"Téléphone"`). A letter that is
/// also the exact text of a header (`"NOM"`, `"INE"`) resolves to that header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnRef {
    Letter(String),
    Name(String),
}

impl ColumnRef {
    pub fn letter(value: &str) -> Self {
        Self::Letter(value.trim().to_ascii_uppercase())
    }

    pub fn name(value: &str) -> Self {
        Self::Name(value.trim().to_string())
    }

    /// Resolve against the (unique) headers of a file.
    pub fn resolve(&self, headers: &[String]) -> Result<usize> {
        match self {
            Self::Letter(letter) => match headers.iter().position(|header| header == letter) {
                Some(index) => Ok(index),
                None => column_letter_to_index(letter),
            },
            Self::Name(name) => headers
                .iter()
                .position(|header| header == name)
                .or_else(|| {
                    let wanted = lowered(name);
                    headers.iter().position(|header| lowered(header) == wanted)
                })
                .ok_or_else(|| IngestError::UnknownColumn { name: name.clone() }),
        }
    }
}

impl FromStr for ColumnRef {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IngestError::InvalidColumnLetter {
                value: value.to_string(),
            });
        }
        let is_letter = trimmed.len() <= 3 && trimmed.chars().all(|ch| ch.is_ascii_uppercase());
        if is_letter {
            Ok(Self::letter(trimmed))
        } else {
            Ok(Self::name(trimmed))
        }
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColumnRef> for String {
    fn from(value: ColumnRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) | Self::Name(letter) => f.write_str(letter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn letters_map_to_indices() {
        assert_eq!(column_letter_to_index("A").unwrap(), 0);
        assert_eq!(column_letter_to_index("I").unwrap(), 8);
        assert_eq!(column_letter_to_index("z").unwrap(), 25);
        assert_eq!(column_letter_to_index("AA").unwrap(), 26);
        assert_eq!(column_letter_to_index(" AB ").unwrap(), 27);
        assert!(matches!(
            column_letter_to_index("A1"),
            Err(IngestError::InvalidColumnLetter { .. })
        ));
        assert!(column_letter_to_index("").is_err());
    }

    #[test]
    fn indices_map_back_to_letters() {
        for index in [0, 8, 25, 26, 27, 701, 702] {
            let letter = column_index_to_letter(index);
            assert_eq!(column_letter_to_index(&letter).unwrap(), index);
        }
        assert_eq!(column_index_to_letter(8), "I");
    }

    #[test]
    fn repeated_headers_get_suffixes() {
        let unique = make_unique_headers(&headers(&["Nom", "Groupes", "Nom", "Nom"]));
        assert_eq!(unique, vec!["Nom", "Groupes", "Nom.1", "Nom.2"]);
    }

    #[test]
    fn given_name_header_is_not_a_family_name() {
        let found = detect_name_columns(&headers(&["Prénom", "N°", "NOM de naissance"]));
        assert_eq!(found, (Some(2), Some(0)));

        let english = detect_name_columns(&headers(&["First Name", "Last Name"]));
        assert_eq!(english, (Some(1), Some(0)));

        assert_eq!(detect_name_columns(&headers(&["A", "B"])), (None, None));
    }

    #[test]
    fn phone_and_identifier_detection() {
        let row = headers(&["Identifiant", "Nom", "Tél.", "Groupes"]);
        assert_eq!(detect_identifier_column(&row), Some(0));
        assert_eq!(detect_phone_column(&row), Some(2));
        // "id" must be a whole word.
        assert_eq!(detect_identifier_column(&headers(&["Valide"])), None);
    }

    #[test]
    fn column_refs_parse_letters_and_names() {
        assert_eq!("I".parse::<ColumnRef>().unwrap(), ColumnRef::letter("I"));
        assert_eq!("Nom".parse::<ColumnRef>().unwrap(), ColumnRef::name("Nom"));
        assert_eq!(
            "Téléphone".parse::<ColumnRef>().unwrap(),
            ColumnRef::name("Téléphone")
        );
        let row = headers(&["Nom", "Prénom"]);
        assert_eq!(ColumnRef::name("prénom").resolve(&row).unwrap(), 1);
        assert!(matches!(
            ColumnRef::name("Groupes").resolve(&row),
            Err(IngestError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn uppercase_header_wins_over_column_letter() {
        let row = headers(&["ID", "NOM", "PRENOM", "Groupes"]);
        let nom: ColumnRef = "NOM".parse().unwrap();
        assert_eq!(nom, ColumnRef::letter("NOM"));
        assert_eq!(nom.resolve(&row).unwrap(), 1);
        assert_eq!(ColumnRef::letter("ID").resolve(&row).unwrap(), 0);
        // No header named "D": plain column letter.
        assert_eq!(ColumnRef::letter("D").resolve(&row).unwrap(), 3);
    }
}
