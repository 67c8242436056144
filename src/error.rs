use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the quiz generation core.
///
/// The outer HTTP layer maps `Validation` to a client error and
/// `Model`/`Timeout`/`Generation` to an upstream failure; the wrapper
/// variants keep their source reachable so that mapping can inspect it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not extract {0} from the response")]
    Extraction(&'static str),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to generate quiz: {0}")]
    Generation(#[source] Box<Error>),

    #[error("Failed to generate new questions. Please try again.")]
    Regeneration(#[source] Box<Error>),

    #[error("Model request failed: {0}")]
    Model(#[from] reqwest::Error),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Innermost non-wrapper error, unwrapping `Generation`/`Regeneration`.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Generation(inner) | Error::Regeneration(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Error::Validation(err.to_string())
    }
}
