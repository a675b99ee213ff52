use thiserror::Error;

/// Invalid builder configuration detected by `build_condition`.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid sort key `{0}`: sort keys must not contain whitespace")]
    InvalidSortKey(String),

    #[error("invalid variable name `{0}`")]
    InvalidVariable(String),

    #[error("result variable `{0}` collides with a generated variable name")]
    ReservedVariable(String),
}

/// Failure of a concept store to produce a defining description.
#[derive(Debug, Error)]
pub enum ConceptStoreError {
    #[error("malformed definition for concept `{concept}`: {source}")]
    Malformed {
        concept: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("concept store unavailable: {0}")]
    Unavailable(String),
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;
