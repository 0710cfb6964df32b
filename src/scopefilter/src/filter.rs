//! Filter pipeline
//!
//! ```text
//! column → AcceptList::validate ─┐
//!                                ├→ resolve_action (per action) → intersect_all → build_predicate
//! permissions ───────────────────┘
//! ```

use crate::accept_list::AcceptList;
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::intersect::intersect_all;
use crate::predicate::{build_predicate, SqlFilter};
use crate::resolver::resolve_action;
use crate::types::{PermissionSet, ScopeAttribute, SignedInUser};
use parking_lot::RwLock;
use tracing::{debug, info};

/// Builds a predicate from the built-in accept-list and default configuration.
///
/// # Example
///
/// ```
/// use scopefilter::{filter, PermissionSet, ScopeAttribute};
///
/// let permissions = PermissionSet::new()
///     .grant("datasources:read", "datasources:id:3")
///     .grant("datasources:read", "datasources:id:7");
///
/// let sql = filter(&permissions, "data_source.id", "datasources", ScopeAttribute::Id, &["datasources:read"]).unwrap();
/// assert_eq!(sql.where_clause, "data_source.id IN (?, ?)");
/// assert_eq!(sql.args.len(), 2);
/// ```
pub fn filter<A: AsRef<str>>(
    permissions: &PermissionSet,
    column: &str,
    prefix: &str,
    attribute: ScopeAttribute,
    actions: &[A],
) -> Result<SqlFilter> {
    run(
        AcceptList::builtin(),
        &FilterConfig::default(),
        permissions,
        column,
        prefix,
        attribute,
        actions,
    )
}

fn run<A: AsRef<str>>(
    accept_list: &AcceptList,
    config: &FilterConfig,
    permissions: &PermissionSet,
    column: &str,
    prefix: &str,
    attribute: ScopeAttribute,
    actions: &[A],
) -> Result<SqlFilter> {
    config.validate()?;
    accept_list.validate(column, attribute)?;
    resolve(config, permissions, column, prefix, attribute, actions)
}

/// Resolves and builds the predicate; `column` is already validated.
fn resolve<A: AsRef<str>>(
    config: &FilterConfig,
    permissions: &PermissionSet,
    column: &str,
    prefix: &str,
    attribute: ScopeAttribute,
    actions: &[A],
) -> Result<SqlFilter> {
    let per_action = actions
        .iter()
        .map(|action| resolve_action(permissions, action.as_ref(), prefix, attribute));
    let authorization = intersect_all(per_action)?;

    debug!(
        column,
        prefix,
        %attribute,
        actions = actions.len(),
        unrestricted = authorization.is_unrestricted(),
        empty = authorization.is_empty(),
        "resolved scope filter"
    );

    Ok(build_predicate(
        authorization,
        column,
        config.placeholder,
        config.first_param,
    ))
}

/// Configured filter engine
///
/// Holds its own accept-list so deployments can register extra columns.
/// The list sits behind a read/write lock; filtering takes the read side.
pub struct Filter {
    config: FilterConfig,
    accept_list: RwLock<AcceptList>,
}

impl Filter {
    /// Create an engine over the built-in accept-list plus `config.extra_columns`
    pub fn new(config: FilterConfig) -> Self {
        let mut accept_list = AcceptList::builtin().clone();
        for (attribute, columns) in &config.extra_columns {
            for column in columns {
                accept_list.allow(*attribute, column.clone());
            }
        }

        Self {
            config,
            accept_list: RwLock::new(accept_list),
        }
    }

    /// Same as [`Filter::new`], rejecting an out-of-range configuration
    pub fn try_new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create an engine that accepts exactly the columns in `accept_list`
    pub fn with_accept_list(config: FilterConfig, accept_list: AcceptList) -> Self {
        Self {
            config,
            accept_list: RwLock::new(accept_list),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Snapshot of the current accept-list
    pub fn accept_list(&self) -> AcceptList {
        self.accept_list.read().clone()
    }

    /// Registers an additional column
    pub fn allow_column(&self, attribute: ScopeAttribute, column: impl Into<String>) {
        let column = column.into();
        info!(%attribute, column = %column, "extending accept list");
        self.accept_list.write().allow(attribute, column);
    }

    /// Builds a predicate restricting `column` to what `permissions` grant
    /// under every action in `actions`.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidColumn`] if `column` is not accepted for `attribute`
    /// - [`FilterError::NoActions`] if `actions` is empty
    /// - [`FilterError::InvalidConfig`] if the engine configuration is out of range
    pub fn filter<A: AsRef<str>>(
        &self,
        permissions: &PermissionSet,
        column: &str,
        prefix: &str,
        attribute: ScopeAttribute,
        actions: &[A],
    ) -> Result<SqlFilter> {
        let accept_list = self.accept_list.read();
        run(
            &accept_list,
            &self.config,
            permissions,
            column,
            prefix,
            attribute,
            actions,
        )
    }

    /// Same as [`Filter::filter`] using the user's permissions for its current org.
    ///
    /// Fails with [`FilterError::MissingPermissions`] if the user carries no
    /// permission set for that org. An empty set is not an error.
    pub fn filter_for_user<A: AsRef<str>>(
        &self,
        user: &SignedInUser,
        column: &str,
        prefix: &str,
        attribute: ScopeAttribute,
        actions: &[A],
    ) -> Result<SqlFilter> {
        self.config.validate()?;
        self.accept_list.read().validate(column, attribute)?;

        let permissions = user
            .current_permissions()
            .ok_or(FilterError::MissingPermissions { org_id: user.org_id })?;

        resolve(&self.config, permissions, column, prefix, attribute, actions)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
