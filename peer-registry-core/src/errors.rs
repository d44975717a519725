use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid user data document: {0}")]
    InvalidDocument(String),
}

impl RegistryError {
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        RegistryError::InvalidDocument(message.into())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
