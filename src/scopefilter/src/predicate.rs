//! SQL predicate building

use crate::resolver::Authorization;
use crate::types::ScopeValue;
use serde::{Deserialize, Serialize};

/// Always-true clause
pub const ALLOW_ALL: &str = "1 = 1";

/// Always-false clause
pub const DENY_ALL: &str = "1 = 0";

/// Bind parameter syntax of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` (SQLite, MySQL)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

impl PlaceholderStyle {
    fn write(&self, out: &mut String, index: usize) {
        match self {
            Self::Question => out.push('?'),
            Self::Dollar => {
                out.push('$');
                out.push_str(&index.to_string());
            }
        }
    }
}

/// Parameterized WHERE fragment and its bound arguments
///
/// `args` are in placeholder order. Append the fragment after `WHERE` or
/// `AND`, then bind `args` in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlFilter {
    #[serde(rename = "where")]
    pub where_clause: String,
    pub args: Vec<ScopeValue>,
}

impl SqlFilter {
    pub fn allow_all() -> Self {
        Self {
            where_clause: ALLOW_ALL.to_string(),
            args: Vec::new(),
        }
    }

    pub fn deny_all() -> Self {
        Self {
            where_clause: DENY_ALL.to_string(),
            args: Vec::new(),
        }
    }

    pub fn is_allow_all(&self) -> bool {
        self.where_clause == ALLOW_ALL
    }

    pub fn is_deny_all(&self) -> bool {
        self.where_clause == DENY_ALL
    }
}

/// Turns an [`Authorization`] into a predicate on `column`.
///
/// `column` must already be validated against the accept-list; it is the
/// only caller-provided text written into the clause. Values come out in
/// ascending order. `first_param` is the index of the first `$n`
/// placeholder and is ignored for `?` placeholders. Indices start at 1
/// even if `first_param` is 0 and saturate at `usize::MAX`; use
/// [`FilterConfig::validate`](crate::FilterConfig::validate) to reject such
/// values up front.
pub fn build_predicate(
    authorization: Authorization,
    column: &str,
    style: PlaceholderStyle,
    first_param: usize,
) -> SqlFilter {
    let values = match authorization {
        Authorization::Unrestricted => return SqlFilter::allow_all(),
        Authorization::Restricted(values) if values.is_empty() => return SqlFilter::deny_all(),
        Authorization::Restricted(values) => values,
    };

    let first_param = first_param.max(1);
    let mut clause = String::with_capacity(column.len() + 6 + values.len() * 4);
    clause.push_str(column);
    clause.push_str(" IN (");
    for i in 0..values.len() {
        if i > 0 {
            clause.push_str(", ");
        }
        style.write(&mut clause, first_param.saturating_add(i));
    }
    clause.push(')');

    SqlFilter {
        where_clause: clause,
        args: values.into_iter().collect(),
    }
}
