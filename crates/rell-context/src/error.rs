//! Context resolution errors.
//!
//! None of these escape [`ContextParser::from_values`](crate::ContextParser::from_values):
//! a malformed field is replaced by its default and the error is kept as a
//! fallback record on the [`Resolution`](crate::Resolution).

use std::num::ParseIntError;

/// A field that could not be resolved from request input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("invalid app id {value:?}: {source}")]
    InvalidAppId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("environment label {0:?} is not a valid host label")]
    InvalidEnv(String),

    #[error("unknown SDK version {0:?}")]
    UnknownVersion(String),

    #[error("unknown view mode {0:?}")]
    UnknownViewMode(String),
}

impl ContextError {
    /// The input key the failing value was read from.
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvalidAppId { .. } => crate::parser::keys::APP_ID,
            Self::InvalidEnv(_) => crate::parser::keys::SERVER,
            Self::UnknownVersion(_) => crate::parser::keys::VERSION,
            Self::UnknownViewMode(_) => crate::parser::keys::VIEW_MODE,
        }
    }
}
