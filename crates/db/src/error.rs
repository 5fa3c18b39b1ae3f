use thiserror::Error;

/// Failures raised by the store and the services built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} '{id}' already exists")]
    Duplicate { entity: &'static str, id: String },

    #[error("{entity} references unknown {target} '{id}'")]
    InvalidReference {
        entity: &'static str,
        target: &'static str,
        id: String,
    },

    #[error("failed to read catalog seed '{path}': {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog seed: {0}")]
    SeedParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
