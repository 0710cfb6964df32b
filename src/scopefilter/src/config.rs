//! Filter configuration

use crate::error::{FilterError, Result};
use crate::predicate::PlaceholderStyle;
use crate::types::ScopeAttribute;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Highest bind parameter index PostgreSQL accepts
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Filter engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Placeholder syntax for generated predicates
    #[serde(default)]
    pub placeholder: PlaceholderStyle,

    /// Index of the first `$n` placeholder
    #[serde(default = "default_first_param")]
    pub first_param: usize,

    /// Columns accepted in addition to the built-in table
    #[serde(default)]
    pub extra_columns: HashMap<ScopeAttribute, Vec<String>>,
}

fn default_first_param() -> usize {
    1
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::default(),
            first_param: default_first_param(),
            extra_columns: HashMap::new(),
        }
    }
}

impl FilterConfig {
    /// Configuration for PostgreSQL-style placeholders
    pub fn postgres() -> Self {
        Self {
            placeholder: PlaceholderStyle::Dollar,
            ..Self::default()
        }
    }

    /// Validate configuration values
    ///
    /// `first_param` must be a usable `$n` index: at least 1 and at most
    /// [`MAX_BIND_PARAMS`].
    pub fn validate(&self) -> Result<()> {
        if self.first_param == 0 {
            return Err(FilterError::InvalidConfig(
                "first_param must be at least 1".to_string(),
            ));
        }
        if self.first_param > MAX_BIND_PARAMS {
            return Err(FilterError::InvalidConfig(format!(
                "first_param must be at most {}, got {}",
                MAX_BIND_PARAMS, self.first_param
            )));
        }
        Ok(())
    }
}
