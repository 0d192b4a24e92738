#![deny(unsafe_code)]

pub mod doctor;
pub mod error;
pub mod registry;
pub mod table;

pub use crate::doctor::DoctorReport;
pub use crate::error::RegistryError;
pub use crate::registry::TaxonomyRegistry;
pub use crate::table::{ClasseRow, FiliereRow, TaxonomyTable};
