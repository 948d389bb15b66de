use thiserror::Error;

/// Errors raised by catalog operations.
///
/// Mutations treat a missing collection or track as a silent no-op; only the
/// read lookup reports `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("collection not found: {0}")]
    NotFound(String),
}

/// Failures of the external search provider.  None of these are fatal: the
/// app core turns every one of them into an empty result set plus a toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with an `error` object.
    #[error("search provider error{}: {}", code_suffix(.code), .message)]
    Reported { code: Option<u16>, message: String },

    /// The response had no `items` list.
    #[error("no results returned by search provider")]
    NoResults,

    /// An item did not match the expected schema.
    #[error("malformed search response: {0}")]
    Malformed(String),

    #[error("search request failed: {0}")]
    Transport(String),

    #[error("search provider returned status {0}")]
    Status(u16),

    #[error("no API key found in ${0}")]
    MissingCredential(String),
}

fn code_suffix(code: &Option<u16>) -> String {
    code.map(|c| format!(" {}", c)).unwrap_or_default()
}

impl ProviderError {
    /// Short text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Reported { message, .. } => format!("Search failed: {}", message),
            ProviderError::NoResults => "No results found".to_string(),
            ProviderError::MissingCredential(_) => {
                "Search unavailable: API key not configured".to_string()
            }
            other => format!("Search failed: {}", other),
        }
    }
}
