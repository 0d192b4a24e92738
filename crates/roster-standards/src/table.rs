#![deny(unsafe_code)]

use roster_model::Code;
use serde::{Deserialize, Serialize};

/// Raw taxonomy table, as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTable {
    pub taxonomy: TableHeader,
    #[serde(default)]
    pub exceptions: ExceptionRows,
    #[serde(default, rename = "filiere")]
    pub filieres: Vec<FiliereRow>,
    #[serde(default, rename = "classe")]
    pub classes: Vec<ClasseRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHeader {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExceptionRows {
    #[serde(default)]
    pub classe_only: Vec<Code>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiliereRow {
    pub code: Code,
    pub label: String,
    #[serde(default)]
    pub classes: Vec<Code>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClasseRow {
    pub code: Code,
    pub label: String,
    /// Legacy hand-maintained owners. Checked against the derived inverse,
    /// never used as a source of truth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filieres: Option<Vec<Code>>,
}

impl TaxonomyTable {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            taxonomy: TableHeader {
                name: name.to_string(),
                version: version.to_string(),
            },
            exceptions: ExceptionRows::default(),
            filieres: Vec::new(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filiere(mut self, code: u64, label: &str, classes: &[u64]) -> Self {
        self.filieres.push(FiliereRow {
            code: Code(code),
            label: label.to_string(),
            classes: classes.iter().copied().map(Code).collect(),
        });
        self
    }

    #[must_use]
    pub fn with_classe(mut self, code: u64, label: &str) -> Self {
        self.classes.push(ClasseRow {
            code: Code(code),
            label: label.to_string(),
            filieres: None,
        });
        self
    }

    #[must_use]
    pub fn with_exception(mut self, code: u64) -> Self {
        self.exceptions.classe_only.push(Code(code));
        self
    }
}
