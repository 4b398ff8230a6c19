use std::fmt;

/// Errors raised by the index manager's core operations.
///
/// This mirrors the source project's error handling: a closed set of named
/// failure kinds rather than a generic string error, so callers can match on
/// `ProviderUnavailable` vs `IndexMissing` vs a backend failure without
/// parsing messages.
#[derive(Debug)]
pub enum RagError {
    ProviderUnavailable(String),
    IndexMissing(String),
    BackendFatal(String),
    Config(String),
    Io(std::io::Error),
}

impl fmt::Display for RagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RagError::ProviderUnavailable(pr_url) => {
                write!(f, "no git provider resolvable for PR URL {pr_url}")
            }
            RagError::IndexMissing(index) => write!(f, "index {index} does not exist"),
            RagError::BackendFatal(msg) => write!(f, "rag backend error: {msg}"),
            RagError::Config(msg) => write!(f, "configuration error: {msg}"),
            RagError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for RagError {}

impl From<std::io::Error> for RagError {
    fn from(value: std::io::Error) -> Self {
        RagError::Io(value)
    }
}
