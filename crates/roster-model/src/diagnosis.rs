//! Diagnostic outcomes assigned to a student's code set.
//!
//! Every student receives exactly one [`Diagnosis`]. Two variants render as
//! "OK": a consistent filière/classe pair, and a classe-only exception code
//! standing without a filière.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Classification outcome for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    /// One filière and one classe, consistent with each other
    Ok,
    /// Classe codes without a filière, legitimised by a classe-only exception
    OkClasseOnly,
    /// Classe codes present but no filière
    NoFiliere,
    /// Filière codes present but no classe
    NoClasse,
    /// No registered code at all
    NoClasseNoFiliere,
    /// More than one distinct filière and more than one distinct classe
    MultipleFilieresAndClasses,
    /// More than one distinct filière
    MultipleFilieres,
    /// More than one distinct classe
    MultipleClasses,
    /// One filière and one classe that do not belong together
    Inconsistent,
}

/// Output language for diagnosis labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Fr,
}

impl Diagnosis {
    /// All diagnoses, in report order.
    pub const ALL: [Diagnosis; 9] = [
        Diagnosis::Ok,
        Diagnosis::OkClasseOnly,
        Diagnosis::NoFiliere,
        Diagnosis::NoClasse,
        Diagnosis::NoClasseNoFiliere,
        Diagnosis::MultipleFilieresAndClasses,
        Diagnosis::MultipleFilieres,
        Diagnosis::MultipleClasses,
        Diagnosis::Inconsistent,
    ];

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok | Self::OkClasseOnly)
    }

    /// English label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok | Self::OkClasseOnly => "OK",
            Self::NoFiliere => "No filière",
            Self::NoClasse => "No classe",
            Self::NoClasseNoFiliere => "No classe and no filière",
            Self::MultipleFilieresAndClasses => "Multiple filières and multiple classes",
            Self::MultipleFilieres => "Multiple filières",
            Self::MultipleClasses => "Multiple classes",
            Self::Inconsistent => "Classe and filière inconsistent",
        }
    }

    /// French label, as printed on exported error lists.
    pub fn label_fr(&self) -> &'static str {
        match self {
            Self::Ok | Self::OkClasseOnly => "OK",
            Self::NoFiliere => "Pas de filière",
            Self::NoClasse => "Pas de classe",
            Self::NoClasseNoFiliere => "Pas de classe ni de filière",
            Self::MultipleFilieresAndClasses => "Plusieurs filières et plusieurs classes",
            Self::MultipleFilieres => "Plusieurs filières",
            Self::MultipleClasses => "Plusieurs classes",
            Self::Inconsistent => "Classe et filière incohérents",
        }
    }

    pub fn label_for(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.label(),
            Locale::Fr => self.label_fr(),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Diagnosis {
    type Err = ModelError;

    /// Parse the snake_case identifier used in serialized output.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" => Ok(Self::Ok),
            "ok_classe_only" => Ok(Self::OkClasseOnly),
            "no_filiere" => Ok(Self::NoFiliere),
            "no_classe" => Ok(Self::NoClasse),
            "no_classe_no_filiere" => Ok(Self::NoClasseNoFiliere),
            "multiple_filieres_and_classes" => Ok(Self::MultipleFilieresAndClasses),
            "multiple_filieres" => Ok(Self::MultipleFilieres),
            "multiple_classes" => Ok(Self::MultipleClasses),
            "inconsistent" => Ok(Self::Inconsistent),
            _ => Err(ModelError::UnknownDiagnosis {
                value: s.to_string(),
            }),
        }
    }
}

/// Per-diagnosis counts for a roster.
///
/// `total()` is always the sum of the per-diagnosis counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisBreakdown {
    counts: BTreeMap<Diagnosis, usize>,
}

impl DiagnosisBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnosis: Diagnosis) {
        *self.counts.entry(diagnosis).or_insert(0) += 1;
    }

    pub fn count(&self, diagnosis: Diagnosis) -> usize {
        self.counts.get(&diagnosis).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn ok_count(&self) -> usize {
        self.count(Diagnosis::Ok) + self.count(Diagnosis::OkClasseOnly)
    }

    pub fn error_count(&self) -> usize {
        self.total() - self.ok_count()
    }

    /// Non-zero counts in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Diagnosis, usize)> + '_ {
        Diagnosis::ALL
            .into_iter()
            .map(|diagnosis| (diagnosis, self.count(diagnosis)))
            .filter(|(_, count)| *count > 0)
    }

    /// Counts merged by display label, in report order.
    ///
    /// `Ok` and `OkClasseOnly` share the label "OK" and become one row; the
    /// first diagnosis of each label is returned with it.
    pub fn by_label(&self, locale: Locale) -> Vec<(Diagnosis, &'static str, usize)> {
        let mut rows: Vec<(Diagnosis, &'static str, usize)> = Vec::new();
        for (diagnosis, count) in self.iter() {
            let label = diagnosis.label_for(locale);
            match rows.iter_mut().find(|(_, existing, _)| *existing == label) {
                Some((_, _, total)) => *total += count,
                None => rows.push((diagnosis, label, count)),
            }
        }
        rows
    }
}

impl FromIterator<Diagnosis> for DiagnosisBreakdown {
    fn from_iter<I: IntoIterator<Item = Diagnosis>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for diagnosis in iter {
            breakdown.record(diagnosis);
        }
        breakdown
    }
}
