/// Scope parsing module
///
/// Turns colon-delimited scope strings into a tagged
/// `prefix:attribute:value` structure with trailing wildcards.
///
/// # Examples
///
/// ```
/// use scopefilter::scope::Scope;
///
/// let scope = Scope::parse("datasources:id:*").unwrap();
/// assert!(scope.covers("datasources", "id"));
/// assert!(!scope.covers("dashboards", "id"));
///
/// assert!(Scope::parse("datasources:id:1*").is_err());
/// ```

mod types;


pub use types::{Scope, ScopeError, ScopeResult, Segment, WILDCARD};
