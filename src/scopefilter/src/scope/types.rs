/// Scope type definitions and validation
///
/// Provides the parsed `prefix:attribute:value` representation of a scope
/// string and the wildcard rules that go with it.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Wildcard marker
pub const WILDCARD: &str = "*";

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors that can occur while parsing a scope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Empty scope string provided
    #[error("scope cannot be empty")]
    EmptyScope,

    /// Scope does not have the `prefix:attribute:value` shape
    #[error("invalid scope format: {0}")]
    InvalidFormat(String),

    /// Invalid wildcard usage
    #[error("invalid wildcard usage: {0}")]
    InvalidWildcard(String),

    /// Scope segment is empty
    #[error("scope segment cannot be empty")]
    EmptySegment,
}

/// One segment of a parsed scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Exact(String),
    Wildcard,
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            Self::Wildcard
        } else {
            Self::Exact(raw.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// True when the segment is the wildcard or equals `expected`
    pub fn admits(&self, expected: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Exact(s) => s == expected,
        }
    }

    /// Exact text, `None` for the wildcard
    pub fn exact(&self) -> Option<&str> {
        match self {
            Self::Exact(s) => Some(s),
            Self::Wildcard => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(s) => s,
            Self::Wildcard => WILDCARD,
        }
    }
}

/// A parsed scope
///
/// Accepted shapes:
/// - `*` (everything, any prefix)
/// - `datasources:*` (everything under a prefix)
/// - `datasources:id:*` (every value of one attribute)
/// - `datasources:id:3` (one value)
///
/// Wildcards are standalone segments and only appear in trailing positions,
/// so a wildcard segment implies every later segment is a wildcard too.
///
/// # Examples
///
/// ```
/// use scopefilter::scope::{Scope, Segment};
///
/// let scope = Scope::parse("datasources:id:3").unwrap();
/// assert_eq!(scope.value(), &Segment::Exact("3".to_string()));
/// assert!(Scope::parse("datasources:*").unwrap().covers("datasources", "id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scope {
    /// Original scope string
    #[serde(skip)]
    raw: String,
    prefix: Segment,
    attribute: Segment,
    value: Segment,
}

impl Scope {
    /// Parses a scope string
    pub fn parse(s: &str) -> ScopeResult<Self> {
        if s.is_empty() {
            return Err(ScopeError::EmptyScope);
        }

        let parts: Vec<&str> = s.split(':').collect();

        let mut seen_wildcard = false;
        for part in &parts {
            if part.is_empty() {
                return Err(ScopeError::EmptySegment);
            }

            if part.contains('*') && *part != WILDCARD {
                return Err(ScopeError::InvalidWildcard(format!(
                    "wildcards must be standalone: '{}'",
                    part
                )));
            }

            if *part == WILDCARD {
                seen_wildcard = true;
            } else if seen_wildcard {
                return Err(ScopeError::InvalidWildcard(format!(
                    "wildcard must be trailing in '{}'",
                    s
                )));
            }
        }

        let (prefix, attribute, value) = match parts.as_slice() {
            [WILDCARD] => (Segment::Wildcard, Segment::Wildcard, Segment::Wildcard),
            [prefix, WILDCARD] => (Segment::parse(prefix), Segment::Wildcard, Segment::Wildcard),
            [prefix, attribute, value] => (
                Segment::parse(prefix),
                Segment::parse(attribute),
                Segment::parse(value),
            ),
            _ => {
                return Err(ScopeError::InvalidFormat(format!(
                    "expected prefix:attribute:value, got {} segment(s) in '{}'",
                    parts.len(),
                    s
                )))
            }
        };

        Ok(Self {
            raw: s.to_string(),
            prefix,
            attribute,
            value,
        })
    }

    pub fn prefix(&self) -> &Segment {
        &self.prefix
    }

    pub fn attribute(&self) -> &Segment {
        &self.attribute
    }

    pub fn value(&self) -> &Segment {
        &self.value
    }

    /// Returns the raw scope string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The universal `*` scope
    pub fn is_universal(&self) -> bool {
        self.prefix.is_wildcard()
    }

    /// Whether any segment is a wildcard
    pub fn has_wildcard(&self) -> bool {
        self.value.is_wildcard()
    }

    /// Checks if this scope grants every value of `prefix:attribute`
    pub fn covers(&self, prefix: &str, attribute: &str) -> bool {
        self.value.is_wildcard() && self.prefix.admits(prefix) && self.attribute.admits(attribute)
    }

    /// Returns the concrete value when this is an exact scope for `prefix:attribute`
    pub fn exact_value(&self, prefix: &str, attribute: &str) -> Option<&str> {
        if self.prefix.exact()? == prefix && self.attribute.exact()? == attribute {
            self.value.exact()
        } else {
            None
        }
    }

    /// Builds the scope string for one resource, e.g. `datasources:id:3`
    pub fn resource(prefix: &str, attribute: &str, value: impl fmt::Display) -> String {
        format!("{}:{}:{}", prefix, attribute, value)
    }

    /// Builds the scope string for every value of an attribute, e.g. `datasources:id:*`
    pub fn all_in_attribute(prefix: &str, attribute: &str) -> String {
        format!("{}:{}:{}", prefix, attribute, WILDCARD)
    }

    /// Builds the scope string for everything under a prefix, e.g. `datasources:*`
    pub fn all_in_prefix(prefix: &str) -> String {
        format!("{}:{}", prefix, WILDCARD)
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
