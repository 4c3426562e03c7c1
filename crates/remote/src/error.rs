//! Remote failure taxonomy.

use std::collections::BTreeMap;

use thiserror::Error;

/// How a remote call failed.
///
/// `Rejected` carries the API's per-field messages for inline display;
/// `Retryable` covers network trouble and 5xx responses where the wizard
/// state is preserved and the user may simply try again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("the order was rejected: {first_message}")]
    Rejected {
        fields: BTreeMap<String, String>,
        first_message: String,
    },

    #[error("temporary failure talking to the order service: {0}")]
    Retryable(String),

    #[error("unexpected response from the order service: {0}")]
    Unexpected(String),
}

impl RemoteError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Retryable(_))
    }

    /// Message for one field, when the API provided a structured map.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self {
            RemoteError::Rejected { fields, .. } => fields.get(field).map(String::as_str),
            _ => None,
        }
    }
}
