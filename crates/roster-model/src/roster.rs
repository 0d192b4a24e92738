//! Roster buckets produced by compilation.
//!
//! Sentinel keys sort after every real code, so iterating a bucket map yields
//! resolved classes first and the "absent" groups last.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::student::StudentRecord;

/// Key of the flat, classe-keyed roster mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKey {
    Classe(Code),
    /// Student has a filière whose classes were not found among its codes.
    NoClasse,
    /// Student has neither a filière nor a classe to place it under.
    NoFiliere,
}

/// Outer key of the two-level roster mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiliereKey {
    Filiere(Code),
    NoFiliere,
}

/// Inner key of the two-level roster mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClasseKey {
    Classe(Code),
    NoClasse,
}

impl RosterKey {
    /// File-name friendly identifier.
    pub fn slug(&self) -> String {
        match self {
            Self::Classe(code) => format!("classe_{code}"),
            Self::NoClasse => "sans_classe".to_string(),
            Self::NoFiliere => "sans_filiere".to_string(),
        }
    }
}

impl FiliereKey {
    pub fn slug(&self) -> String {
        match self {
            Self::Filiere(code) => format!("filiere_{code}"),
            Self::NoFiliere => "sans_filiere".to_string(),
        }
    }
}

impl ClasseKey {
    pub fn slug(&self) -> String {
        match self {
            Self::Classe(code) => format!("classe_{code}"),
            Self::NoClasse => "sans_classe".to_string(),
        }
    }
}

impl fmt::Display for RosterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classe(code) => write!(f, "{code}"),
            Self::NoClasse => f.write_str("Classe absente"),
            Self::NoFiliere => f.write_str("Filière absente"),
        }
    }
}

impl fmt::Display for FiliereKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filiere(code) => write!(f, "{code}"),
            Self::NoFiliere => f.write_str("Filière absente"),
        }
    }
}

impl fmt::Display for ClasseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classe(code) => write!(f, "{code}"),
            Self::NoClasse => f.write_str("Classe absente"),
        }
    }
}

/// One student line in a roster bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub identifier: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub phone: Option<String>,
    /// Source row; orders students whose names compare equal.
    #[serde(skip)]
    pub row: usize,
}

impl From<&StudentRecord> for RosterEntry {
    fn from(record: &StudentRecord) -> Self {
        Self {
            identifier: record.identifier.clone(),
            family_name: record.family_name.clone(),
            given_name: record.given_name.clone(),
            phone: record.phone.clone(),
            row: record.row,
        }
    }
}

/// Class-keyed rosters for one compilation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledRosters {
    /// Flat mapping: resolved classe (or sentinel) to sorted entries.
    pub by_classe: BTreeMap<RosterKey, Vec<RosterEntry>>,
    /// Two-level mapping: filière (or sentinel), then classe (or sentinel).
    pub by_filiere: BTreeMap<FiliereKey, BTreeMap<ClasseKey, Vec<RosterEntry>>>,
    /// Number of students dropped by the exclusion list.
    pub excluded: usize,
}

impl CompiledRosters {
    pub fn bucket(&self, key: RosterKey) -> &[RosterEntry] {
        self.by_classe.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn grouped_bucket(&self, filiere: FiliereKey, classe: ClasseKey) -> &[RosterEntry] {
        self.by_filiere
            .get(&filiere)
            .and_then(|classes| classes.get(&classe))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of placements across flat buckets.
    pub fn placement_count(&self) -> usize {
        self.by_classe.values().map(Vec::len).sum()
    }
}
