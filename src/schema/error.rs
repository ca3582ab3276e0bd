use thiserror::Error;

/// Schema inference errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Sample row was not a JSON object
    #[error("Sample row is not an object")]
    NotAnObject,

    /// Sample row had no properties to infer from
    #[error("Sample row has no fields")]
    EmptySample,

    /// No row selected to sample fields from
    #[error("No sample row selected")]
    NoSampleRow,

    /// Entity type name not in the catalog
    #[error("Unknown entity type '{0}'")]
    UnknownEntity(String),
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, SchemaError>;
