//! Errors raised while refreshing the state graph or building filters.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// A record lacks a field that identifies it.
    #[error("{kind} record is missing its {field}")]
    MissingIdentity {
        kind: &'static str,
        field: &'static str,
    },

    /// Credential-store names are absolute.
    #[error("invalid credential name '{0}': must start with '/'")]
    InvalidName(String),

    #[error("duplicate credential version id '{0}'")]
    DuplicateCredential(String),

    #[error("unknown credential type '{0}'")]
    UnknownCredentialType(String),
}
