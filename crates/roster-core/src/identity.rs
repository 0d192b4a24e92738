//! Name normalization and the roster exclusion list.

use std::collections::BTreeSet;

use roster_model::StudentRecord;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a name for identity comparison.
///
/// Decomposes to NFD, drops combining marks, lowercases and collapses
/// whitespace, so `"  Élise  MARTIN"` and `"elise martin"` compare equal.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A normalized (family name, given name) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub family_name: String,
    pub given_name: String,
}

impl Identity {
    pub fn new(family_name: &str, given_name: &str) -> Self {
        Self {
            family_name: normalize_name(family_name),
            given_name: normalize_name(given_name),
        }
    }

    pub fn of(record: &StudentRecord) -> Self {
        Self::new(record.family_name_or_empty(), record.given_name_or_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.family_name.is_empty() && self.given_name.is_empty()
    }
}

/// Students dropped from every roster bucket, whatever their diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    identities: BTreeSet<Identity>,
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity; blank identities are ignored so unnamed rows never match.
    pub fn insert(&mut self, family_name: &str, given_name: &str) -> bool {
        let identity = Identity::new(family_name, given_name);
        if identity.is_blank() {
            return false;
        }
        self.identities.insert(identity)
    }

    #[must_use]
    pub fn with(mut self, family_name: &str, given_name: &str) -> Self {
        self.insert(family_name, given_name);
        self
    }

    pub fn contains(&self, record: &StudentRecord) -> bool {
        !self.identities.is_empty() && self.identities.contains(&Identity::of(record))
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ExclusionList {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (family_name, given_name) in iter {
            list.insert(family_name, given_name);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(normalize_name("  Élise  MARTIN "), "elise martin");
        assert_eq!(normalize_name("Chloé"), "chloe");
        assert_eq!(normalize_name("Noël"), "noel");
    }

    #[test]
    fn matches_records_by_normalized_identity() {
        let list = ExclusionList::new().with("Lefèvre", "Zoé");
        let record = StudentRecord::new(3).with_names("LEFEVRE", "zoe");
        assert!(list.contains(&record));
        let other = StudentRecord::new(4).with_names("Lefèvre", "Zoéline");
        assert!(!list.contains(&other));
    }

    #[test]
    fn blank_identities_never_match() {
        let mut list = ExclusionList::new();
        assert!(!list.insert(" ", ""));
        assert!(list.is_empty());
        assert!(!list.contains(&StudentRecord::new(0)));
    }
}
