pub mod code;
pub mod diagnosis;
pub mod error;
pub mod roster;
pub mod student;

pub use code::{Code, CodeKind};
pub use diagnosis::{Diagnosis, DiagnosisBreakdown, Locale};
pub use error::{ModelError, Result};
pub use roster::{ClasseKey, CompiledRosters, FiliereKey, RosterEntry, RosterKey};
pub use student::{ClassifiedStudent, CodeDescription, ErrorEntry, StudentRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_total_is_sum_of_counts() {
        let breakdown: DiagnosisBreakdown = [
            Diagnosis::Ok,
            Diagnosis::OkClasseOnly,
            Diagnosis::NoFiliere,
            Diagnosis::NoFiliere,
            Diagnosis::Inconsistent,
        ]
        .into_iter()
        .collect();
        assert_eq!(breakdown.total(), 5);
        assert_eq!(breakdown.ok_count(), 2);
        assert_eq!(breakdown.error_count(), 3);
        assert_eq!(breakdown.count(Diagnosis::NoFiliere), 2);
        let listed: usize = breakdown.iter().map(|(_, count)| count).sum();
        assert_eq!(listed, breakdown.total());
    }

    #[test]
    fn classified_student_serializes() {
        let student = ClassifiedStudent {
            record: StudentRecord::new(0).with_names("Durand", "Léa").with_codes("5016 5944"),
            diagnosis: Diagnosis::Ok,
            description: CodeDescription {
                found: vec![Code(5016), Code(5944)],
                known: vec![Code(5016), Code(5944)],
                unknown: vec![],
                filiere_label: Some("USPN (5016)".to_string()),
                classe_label: Some("USPN (5944)".to_string()),
            },
        };
        let json = serde_json::to_string(&student).expect("serialize student");
        assert!(json.contains("\"diagnosis\":\"ok\""));
        let round: ClassifiedStudent = serde_json::from_str(&json).expect("deserialize student");
        assert_eq!(round, student);
    }
}
