//! # Scope Filter
//!
//! Turns a principal's scope-based permissions into a parameterized SQL
//! predicate that limits a query to the rows the principal may see.
//!
//! ## Features
//!
//! - **Scope parsing** of `prefix:attribute:value` strings with trailing `*` wildcards
//! - **Column accept-list** keyed by attribute kind, checked before any SQL is built
//! - **Per-action resolution** with wildcard short-circuit and de-duplication
//! - **Cross-action intersection**: a row must be allowed by every required action
//! - **Predicate building** with `?` or `$n` placeholders and bound arguments only
//! - **sqlx helpers** to bind the arguments (`sqlite`, `postgres` features)
//!
//! ## Example
//!
//! ```rust
//! use scopefilter::{filter, PermissionSet, ScopeAttribute, ScopeValue};
//!
//! let permissions = PermissionSet::new()
//!     .grant("datasources:read", "datasources:id:3")
//!     .grant("datasources:read", "datasources:id:8")
//!     .grant("datasources:write", "datasources:*");
//!
//! let sql = filter(
//!     &permissions,
//!     "data_source.id",
//!     "datasources",
//!     ScopeAttribute::Id,
//!     &["datasources:read", "datasources:write"],
//! )?;
//!
//! assert_eq!(sql.where_clause, "data_source.id IN (?, ?)");
//! assert_eq!(sql.args, vec![ScopeValue::Int(3), ScopeValue::Int(8)]);
//! # Ok::<(), scopefilter::FilterError>(())
//! ```

pub mod accept_list;
pub mod config;
pub mod error;
pub mod filter;
pub mod intersect;
pub mod predicate;
pub mod resolver;
pub mod scope;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;
pub mod types;

// Re-export commonly used types
pub use accept_list::AcceptList;
pub use config::FilterConfig;
pub use error::{FilterError, Result};
pub use filter::{filter, Filter};
pub use intersect::intersect_all;
pub use predicate::{build_predicate, PlaceholderStyle, SqlFilter};
pub use resolver::{parse_scopes, resolve_action, Authorization};
pub use scope::{Scope, ScopeError, Segment};
pub use types::{PermissionSet, ScopeAttribute, ScopeValue, SignedInUser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
