//! Per-action scope resolution

use crate::scope::Scope;
use crate::types::{PermissionSet, ScopeAttribute, ScopeValue};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// What a principal may see for one prefix/attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Authorization {
    /// No row-level filtering needed
    Unrestricted,
    /// Only these values; an empty set means no rows
    Restricted(BTreeSet<ScopeValue>),
}

impl Authorization {
    /// `Restricted(∅)`
    pub fn none() -> Self {
        Self::Restricted(BTreeSet::new())
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// True for `Restricted(∅)`
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Restricted(values) if values.is_empty())
    }
}

/// Folds scope strings into an [`Authorization`] for `prefix:attribute`.
///
/// The first scope covering the whole prefix/attribute wins. Scopes that
/// fail to parse, or whose value does not fit the attribute, are skipped.
pub fn parse_scopes<S: AsRef<str>>(
    prefix: &str,
    attribute: ScopeAttribute,
    scopes: &[S],
) -> Authorization {
    let mut values = BTreeSet::new();

    for raw in scopes {
        let raw = raw.as_ref();
        let scope = match Scope::parse(raw) {
            Ok(scope) => scope,
            Err(e) => {
                debug!(scope = raw, error = %e, "skipping malformed scope");
                continue;
            }
        };

        if scope.covers(prefix, attribute.as_str()) {
            debug!(scope = raw, prefix, %attribute, "wildcard scope grants unrestricted access");
            return Authorization::Unrestricted;
        }

        let Some(value) = scope.exact_value(prefix, attribute.as_str()) else {
            continue;
        };

        match attribute.parse_value(value) {
            Some(value) => {
                values.insert(value);
            }
            None => {
                debug!(scope = raw, %attribute, "skipping scope with value of wrong type");
            }
        }
    }

    Authorization::Restricted(values)
}

/// Resolves what `action` grants on `prefix:attribute`.
///
/// An action absent from the permission set grants nothing.
pub fn resolve_action(
    permissions: &PermissionSet,
    action: &str,
    prefix: &str,
    attribute: ScopeAttribute,
) -> Authorization {
    match permissions.scopes(action) {
        Some(scopes) => parse_scopes(prefix, attribute, scopes),
        None => {
            debug!(action, "action not granted");
            Authorization::none()
        }
    }
}
