#![deny(unsafe_code)]

use roster_model::Code;

use crate::registry::TaxonomyRegistry;

/// Machine-readable summary of a loaded taxonomy.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub name: String,
    pub version: String,
    pub fingerprint: String,
    pub counts: DoctorCounts,
    /// Filières that admit no classe; their students always land in "classe absent".
    pub filieres_without_classes: Vec<Code>,
    /// Classes listed by more than one filière.
    pub shared_classes: Vec<Code>,
    pub classe_only_exceptions: Vec<Code>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorCounts {
    pub filieres: usize,
    pub classes: usize,
    pub links: usize,
    pub exceptions: usize,
}

impl DoctorReport {
    pub fn from_registry(registry: &TaxonomyRegistry) -> Self {
        let filieres_without_classes = registry
            .filieres()
            .map(|(code, _)| code)
            .filter(|code| registry.classes_of(*code).is_empty())
            .collect();
        let shared_classes = registry
            .classes()
            .map(|(code, _)| code)
            .filter(|code| registry.filieres_of(*code).len() > 1)
            .collect();
        let links = registry
            .filieres()
            .map(|(code, _)| registry.classes_of(code).len())
            .sum();
        Self {
            schema: "roster.taxonomy-doctor".to_string(),
            schema_version: 1,
            name: registry.name().to_string(),
            version: registry.version().to_string(),
            fingerprint: registry.fingerprint().to_string(),
            counts: DoctorCounts {
                filieres: registry.filiere_count(),
                classes: registry.classe_count(),
                links,
                exceptions: registry.classe_only_exceptions().len(),
            },
            filieres_without_classes,
            shared_classes,
            classe_only_exceptions: registry.classe_only_exceptions().iter().copied().collect(),
        }
    }
}
