use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Query text is empty")]
    EmptyQuery,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Index is not ready; construction has not completed")]
    IndexNotReady,

    #[error("Index build failed: {0}")]
    BuildFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding provider mismatch: index built with '{expected}', query encoded with '{actual}'")]
    ProviderMismatch { expected: String, actual: String },
}

impl Error {
    /// Wrap any build-phase failure (I/O, model, corpus) with its full context chain.
    pub fn build(err: impl std::fmt::Display) -> Self {
        Error::BuildFailure(format!("{err:#}"))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
