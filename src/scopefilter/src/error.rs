//! Error types for the filter engine

use crate::types::ScopeAttribute;
use thiserror::Error;

/// Filter engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Column identifier is not registered for the attribute kind
    #[error("column '{column}' is not in the accept list for attribute '{attribute}'")]
    InvalidColumn {
        column: String,
        attribute: ScopeAttribute,
    },

    /// No required actions were supplied
    #[error("at least one required action must be supplied")]
    NoActions,

    /// The principal carries no permissions for its current organization
    #[error("missing permissions for organization {org_id}")]
    MissingPermissions { org_id: i64 },

    /// Filter configuration is out of range
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;
