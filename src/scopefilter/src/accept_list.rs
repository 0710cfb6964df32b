//! SQL column accept-list
//!
//! Column identifiers cannot be bound as parameters, so every identifier that
//! ends up in a generated predicate must come from this table.

use crate::error::{FilterError, Result};
use crate::types::ScopeAttribute;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

const ID_COLUMNS: &[&str] = &[
    "data_source.id",
    "dashboard.id",
    "folder.id",
    "team.id",
    "role.id",
    "org_user.user_id",
    "t.id",
    "u.id",
    "\"user\".\"id\"",
    "`user`.`id`",
];

const UID_COLUMNS: &[&str] = &[
    "data_source.uid",
    "dashboard.uid",
    "folder.uid",
    "role.uid",
];

static BUILTIN: Lazy<AcceptList> = Lazy::new(|| {
    let mut list = AcceptList::empty();
    for column in ID_COLUMNS {
        list.allow(ScopeAttribute::Id, *column);
    }
    for column in UID_COLUMNS {
        list.allow(ScopeAttribute::Uid, *column);
    }
    list
});

/// Allowed column identifiers keyed by attribute kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptList {
    columns: HashMap<ScopeAttribute, BTreeSet<String>>,
}

impl AcceptList {
    /// Create a list that accepts nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// The compiled-in table
    pub fn builtin() -> &'static AcceptList {
        &BUILTIN
    }

    /// Register a column for an attribute kind
    pub fn allow(&mut self, attribute: ScopeAttribute, column: impl Into<String>) {
        self.columns.entry(attribute).or_default().insert(column.into());
    }

    /// Builder form of [`AcceptList::allow`]
    pub fn with_column(mut self, attribute: ScopeAttribute, column: impl Into<String>) -> Self {
        self.allow(attribute, column);
        self
    }

    pub fn contains(&self, attribute: ScopeAttribute, column: &str) -> bool {
        self.columns
            .get(&attribute)
            .map_or(false, |columns| columns.contains(column))
    }

    /// Registered columns for an attribute kind, sorted
    pub fn columns(&self, attribute: ScopeAttribute) -> impl Iterator<Item = &str> {
        self.columns
            .get(&attribute)
            .into_iter()
            .flat_map(|columns| columns.iter().map(String::as_str))
    }

    /// Fails with `InvalidColumn` unless `column` is registered for `attribute`
    pub fn validate(&self, column: &str, attribute: ScopeAttribute) -> Result<()> {
        if self.contains(attribute, column) {
            return Ok(());
        }

        warn!(column, %attribute, "rejected column not in accept list");
        Err(FilterError::InvalidColumn {
            column: column.to_string(),
            attribute,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_accepts_known_columns() {
        let list = AcceptList::builtin();
        assert!(list.validate("data_source.id", ScopeAttribute::Id).is_ok());
        assert!(list.validate("`user`.`id`", ScopeAttribute::Id).is_ok());
        assert!(list.validate("dashboard.uid", ScopeAttribute::Uid).is_ok());
    }

    #[test]
    fn test_unknown_column_rejected() {
        let err = AcceptList::builtin()
            .validate("other.id", ScopeAttribute::Id)
            .unwrap_err();

        assert_eq!(
            err,
            FilterError::InvalidColumn {
                column: "other.id".to_string(),
                attribute: ScopeAttribute::Id,
            }
        );
    }

    #[test]
    fn test_column_is_keyed_by_attribute() {
        let list = AcceptList::builtin();
        assert!(list.validate("data_source.id", ScopeAttribute::Uid).is_err());
        assert!(list.validate("data_source.uid", ScopeAttribute::Id).is_err());
    }

    #[test]
    fn test_injection_attempt_rejected() {
        let list = AcceptList::builtin();
        assert!(list
            .validate("data_source.id OR 1 = 1 --", ScopeAttribute::Id)
            .is_err());
        assert!(list.validate("data_source.id ", ScopeAttribute::Id).is_err());
    }

    #[test]
    fn test_extension() {
        let list = AcceptList::empty().with_column(ScopeAttribute::Id, "report.id");
        assert!(list.validate("report.id", ScopeAttribute::Id).is_ok());
        assert!(list.validate("data_source.id", ScopeAttribute::Id).is_err());
        assert_eq!(list.columns(ScopeAttribute::Id).collect::<Vec<_>>(), vec!["report.id"]);
        assert_eq!(list.columns(ScopeAttribute::Uid).count(), 0);
    }
}
