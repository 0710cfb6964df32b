//! Core filter types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Attribute segment of a scope (`datasources:<attribute>:<value>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeAttribute {
    /// Numeric row identifier
    Id,
    /// String unique identifier
    Uid,
}

impl ScopeAttribute {
    /// All attribute kinds, in a stable order
    pub const ALL: [ScopeAttribute; 2] = [ScopeAttribute::Id, ScopeAttribute::Uid];

    /// Scope segment for this attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Uid => "uid",
        }
    }

    /// Converts a raw scope value into a typed value for this attribute.
    ///
    /// Returns `None` when the value does not fit the attribute, e.g. a
    /// non-numeric id.
    pub fn parse_value(&self, raw: &str) -> Option<ScopeValue> {
        match self {
            Self::Id => raw.parse::<i64>().ok().map(ScopeValue::Int),
            Self::Uid => Some(ScopeValue::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for ScopeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "uid" => Ok(Self::Uid),
            other => Err(format!("unknown scope attribute '{}'", other)),
        }
    }
}

/// Concrete value granted by an exact scope, bound as a SQL parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ScopeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ScopeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// Scopes granted per action for one organization
///
/// Serialized as a plain JSON object: `{"datasources:read": ["datasources:id:3"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashMap<String, Vec<String>>);

impl PermissionSet {
    /// Create an empty permission set
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a scope for an action
    pub fn grant(mut self, action: impl Into<String>, scope: impl Into<String>) -> Self {
        self.0.entry(action.into()).or_default().push(scope.into());
        self
    }

    /// Scopes granted for an action, if the action is present at all
    pub fn scopes(&self, action: &str) -> Option<&[String]> {
        self.0.get(action).map(Vec::as_slice)
    }

    /// Number of actions with at least one entry
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for PermissionSet {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<A, S, I> FromIterator<(A, I)> for PermissionSet
where
    A: Into<String>,
    S: Into<String>,
    I: IntoIterator<Item = S>,
{
    fn from_iter<T: IntoIterator<Item = (A, I)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (action, scopes) in iter {
            let entry = set.0.entry(action.into()).or_default();
            entry.extend(scopes.into_iter().map(Into::into));
        }
        set
    }
}

/// Authenticated principal with permissions per organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    /// User identifier
    pub id: i64,

    /// Organization the request is made in
    pub org_id: i64,

    /// Permission sets keyed by organization
    #[serde(default)]
    pub permissions: HashMap<i64, PermissionSet>,
}

impl SignedInUser {
    /// Create a user with no permissions
    pub fn new(id: i64, org_id: i64) -> Self {
        Self {
            id,
            org_id,
            permissions: HashMap::new(),
        }
    }

    /// Attach the permission set for an organization
    pub fn with_permissions(mut self, org_id: i64, permissions: PermissionSet) -> Self {
        self.permissions.insert(org_id, permissions);
        self
    }

    /// Permission set for the current organization
    pub fn current_permissions(&self) -> Option<&PermissionSet> {
        self.permissions.get(&self.org_id)
    }
}
