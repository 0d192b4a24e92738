#![deny(unsafe_code)]

use roster_model::{Code, CodeKind};

/// Structural problems in a taxonomy table.
///
/// Any of these aborts registry construction: no classification may run
/// against a table that fails them.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to parse taxonomy table: {source}")]
    Toml {
        #[source]
        source: toml::de::Error,
    },

    #[error("{kind} {code} has no display name")]
    MissingLabel { code: Code, kind: CodeKind },

    #[error("{kind} {code} is declared more than once")]
    DuplicateCode { code: Code, kind: CodeKind },

    #[error("code {code} is declared both as a filière and as a classe")]
    KindConflict { code: Code },

    #[error("filière {filiere} lists classe {classe}, which is not declared")]
    DanglingClasse { filiere: Code, classe: Code },

    #[error("classe {classe} belongs to no filière and is not a classe-only exception")]
    OrphanClasse { classe: Code },

    #[error(
        "classe {classe} declares filières {declared:?} but the filière table implies {derived:?}"
    )]
    InverseDrift {
        classe: Code,
        declared: Vec<Code>,
        derived: Vec<Code>,
    },

    #[error("classe-only exception {code} is not a declared classe")]
    UnknownException { code: Code },

    #[error("classe-only exception {classe} is listed by filière {filiere}")]
    ExceptionHasFiliere { classe: Code, filiere: Code },
}
