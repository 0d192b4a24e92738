use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::diagnosis::Diagnosis;

/// One row of the source roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// 0-based position in the source roster; breaks sort ties.
    pub row: usize,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub phone: Option<String>,
    pub identifier: Option<String>,
    /// Raw groups cell, as read.
    pub codes: Option<String>,
    /// Remaining columns, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl StudentRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_names(mut self, family_name: &str, given_name: &str) -> Self {
        self.family_name = Some(family_name.to_string());
        self.given_name = Some(given_name.to_string());
        self
    }

    #[must_use]
    pub fn with_codes(mut self, codes: &str) -> Self {
        self.codes = Some(codes.to_string());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    pub fn family_name_or_empty(&self) -> &str {
        self.family_name.as_deref().unwrap_or("")
    }

    pub fn given_name_or_empty(&self) -> &str {
        self.given_name.as_deref().unwrap_or("")
    }
}

/// Lookup details derived from a student's codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDescription {
    /// Every extracted code, in order, duplicates kept.
    pub found: Vec<Code>,
    /// Codes present in the registry, in extraction order.
    pub known: Vec<Code>,
    /// Codes absent from the registry, in extraction order.
    pub unknown: Vec<Code>,
    /// `"<label> (<code>)"` when exactly one distinct filière is present.
    pub filiere_label: Option<String>,
    /// `"<label> (<code>)"` when exactly one distinct classe is present.
    pub classe_label: Option<String>,
}

/// A student record decorated with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedStudent {
    pub record: StudentRecord,
    pub diagnosis: Diagnosis,
    pub description: CodeDescription,
}

/// Minimal export row for a flagged student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub family_name: String,
    pub given_name: String,
    pub diagnosis: Diagnosis,
}

impl From<&ClassifiedStudent> for ErrorEntry {
    fn from(student: &ClassifiedStudent) -> Self {
        Self {
            family_name: student.record.family_name_or_empty().to_string(),
            given_name: student.record.given_name_or_empty().to_string(),
            diagnosis: student.diagnosis,
        }
    }
}
