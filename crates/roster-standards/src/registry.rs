#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use roster_model::{Code, CodeKind};
use sha2::Digest;

use crate::error::RegistryError;
use crate::table::TaxonomyTable;

const BUILTIN_TABLE: &str = include_str!("../data/taxonomy.toml");

static NO_CODES: BTreeSet<Code> = BTreeSet::new();

/// Immutable filière/classe lookup tables.
///
/// Built once, then shared read-only by every classification and compilation
/// pass. `classe_to_filieres` is always derived from `filiere_to_classes`.
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    name: String,
    version: String,
    fingerprint: String,
    filiere_labels: BTreeMap<Code, String>,
    classe_labels: BTreeMap<Code, String>,
    filiere_to_classes: BTreeMap<Code, BTreeSet<Code>>,
    classe_to_filieres: BTreeMap<Code, BTreeSet<Code>>,
    classe_only_exceptions: BTreeSet<Code>,
}

impl TaxonomyRegistry {
    /// Load the table compiled into the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let table: TaxonomyTable =
            toml::from_str(contents).map_err(|source| RegistryError::Toml { source })?;
        Self::from_table(&table)
    }

    pub fn from_table(table: &TaxonomyTable) -> Result<Self, RegistryError> {
        let mut filiere_labels = BTreeMap::new();
        let mut filiere_to_classes = BTreeMap::new();
        for row in &table.filieres {
            let label = require_label(row.code, CodeKind::Filiere, &row.label)?;
            if filiere_labels.insert(row.code, label).is_some() {
                return Err(RegistryError::DuplicateCode {
                    code: row.code,
                    kind: CodeKind::Filiere,
                });
            }
            filiere_to_classes.insert(row.code, row.classes.iter().copied().collect());
        }

        let mut classe_labels = BTreeMap::new();
        for row in &table.classes {
            let label = require_label(row.code, CodeKind::Classe, &row.label)?;
            if filiere_labels.contains_key(&row.code) {
                return Err(RegistryError::KindConflict { code: row.code });
            }
            if classe_labels.insert(row.code, label).is_some() {
                return Err(RegistryError::DuplicateCode {
                    code: row.code,
                    kind: CodeKind::Classe,
                });
            }
        }

        let classe_to_filieres = invert(&filiere_to_classes, &classe_labels)?;

        for row in &table.classes {
            let Some(declared) = &row.filieres else {
                continue;
            };
            let declared: BTreeSet<Code> = declared.iter().copied().collect();
            let derived = classe_to_filieres.get(&row.code).unwrap_or(&NO_CODES);
            if &declared != derived {
                return Err(RegistryError::InverseDrift {
                    classe: row.code,
                    declared: declared.into_iter().collect(),
                    derived: derived.iter().copied().collect(),
                });
            }
        }

        let mut classe_only_exceptions = BTreeSet::new();
        for &code in &table.exceptions.classe_only {
            if !classe_labels.contains_key(&code) {
                return Err(RegistryError::UnknownException { code });
            }
            if let Some(filiere) = classe_to_filieres
                .get(&code)
                .and_then(|owners| owners.first())
            {
                return Err(RegistryError::ExceptionHasFiliere {
                    classe: code,
                    filiere: *filiere,
                });
            }
            classe_only_exceptions.insert(code);
        }

        for classe in classe_labels.keys() {
            if !classe_to_filieres.contains_key(classe) && !classe_only_exceptions.contains(classe)
            {
                return Err(RegistryError::OrphanClasse { classe: *classe });
            }
        }

        let mut registry = Self {
            name: table.taxonomy.name.clone(),
            version: table.taxonomy.version.clone(),
            fingerprint: String::new(),
            filiere_labels,
            classe_labels,
            filiere_to_classes,
            classe_to_filieres,
            classe_only_exceptions,
        };
        registry.fingerprint = sha256_hex(registry.canonical_text().as_bytes());
        Ok(registry)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// SHA-256 of the canonical table content; stable across TOML formatting.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn kind(&self, code: Code) -> Option<CodeKind> {
        if self.filiere_labels.contains_key(&code) {
            Some(CodeKind::Filiere)
        } else if self.classe_labels.contains_key(&code) {
            Some(CodeKind::Classe)
        } else {
            None
        }
    }

    pub fn is_filiere(&self, code: Code) -> bool {
        self.filiere_labels.contains_key(&code)
    }

    pub fn is_classe(&self, code: Code) -> bool {
        self.classe_labels.contains_key(&code)
    }

    pub fn is_known(&self, code: Code) -> bool {
        self.kind(code).is_some()
    }

    pub fn is_classe_only_exception(&self, code: Code) -> bool {
        self.classe_only_exceptions.contains(&code)
    }

    pub fn filiere_label(&self, code: Code) -> Option<&str> {
        self.filiere_labels.get(&code).map(String::as_str)
    }

    pub fn classe_label(&self, code: Code) -> Option<&str> {
        self.classe_labels.get(&code).map(String::as_str)
    }

    /// Display name of any registered code.
    pub fn label(&self, code: Code) -> Option<&str> {
        self.filiere_label(code).or_else(|| self.classe_label(code))
    }

    /// Classes admitted by a filière; empty for unknown codes.
    pub fn classes_of(&self, filiere: Code) -> &BTreeSet<Code> {
        self.filiere_to_classes.get(&filiere).unwrap_or(&NO_CODES)
    }

    /// Filières that list a classe; empty for unknown codes and exceptions.
    pub fn filieres_of(&self, classe: Code) -> &BTreeSet<Code> {
        self.classe_to_filieres.get(&classe).unwrap_or(&NO_CODES)
    }

    pub fn filieres(&self) -> impl Iterator<Item = (Code, &str)> + '_ {
        self.filiere_labels
            .iter()
            .map(|(code, label)| (*code, label.as_str()))
    }

    pub fn classes(&self) -> impl Iterator<Item = (Code, &str)> + '_ {
        self.classe_labels
            .iter()
            .map(|(code, label)| (*code, label.as_str()))
    }

    pub fn classe_only_exceptions(&self) -> &BTreeSet<Code> {
        &self.classe_only_exceptions
    }

    pub fn filiere_count(&self) -> usize {
        self.filiere_labels.len()
    }

    pub fn classe_count(&self) -> usize {
        self.classe_labels.len()
    }

    fn canonical_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "taxonomy\t{}\t{}", self.name, self.version);
        for (code, label) in &self.filiere_labels {
            let classes: Vec<String> = self.classes_of(*code).iter().map(Code::to_string).collect();
            let _ = writeln!(out, "filiere\t{code}\t{label}\t{}", classes.join(","));
        }
        for (code, label) in &self.classe_labels {
            let _ = writeln!(out, "classe\t{code}\t{label}");
        }
        for code in &self.classe_only_exceptions {
            let _ = writeln!(out, "exception\t{code}");
        }
        out
    }
}

fn require_label(code: Code, kind: CodeKind, label: &str) -> Result<String, RegistryError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::MissingLabel { code, kind });
    }
    Ok(trimmed.to_string())
}

fn invert(
    filiere_to_classes: &BTreeMap<Code, BTreeSet<Code>>,
    classe_labels: &BTreeMap<Code, String>,
) -> Result<BTreeMap<Code, BTreeSet<Code>>, RegistryError> {
    let mut inverse: BTreeMap<Code, BTreeSet<Code>> = BTreeMap::new();
    for (filiere, classes) in filiere_to_classes {
        for classe in classes {
            if !classe_labels.contains_key(classe) {
                return Err(RegistryError::DanglingClasse {
                    filiere: *filiere,
                    classe: *classe,
                });
            }
            inverse.entry(*classe).or_default().insert(*filiere);
        }
    }
    Ok(inverse)
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}
