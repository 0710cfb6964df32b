//! Cross-action intersection
//!
//! A row is visible only if every required action permits it, so the
//! per-action results are combined with set intersection where
//! `Unrestricted` is the identity element.

use crate::error::{FilterError, Result};
use crate::resolver::Authorization;
use tracing::debug;

impl Authorization {
    /// Intersects two results
    pub fn intersect(self, other: Authorization) -> Authorization {
        match (self, other) {
            (Authorization::Unrestricted, other) => other,
            (this, Authorization::Unrestricted) => this,
            (Authorization::Restricted(left), Authorization::Restricted(right)) => {
                let (small, large) = if left.len() <= right.len() {
                    (left, right)
                } else {
                    (right, left)
                };
                Authorization::Restricted(
                    small.into_iter().filter(|v| large.contains(v)).collect(),
                )
            }
        }
    }
}

/// Folds the results of all required actions into one.
///
/// Fails with [`FilterError::NoActions`] when `results` is empty rather
/// than defaulting to either allow or deny. Stops early once the running
/// result is `Restricted(∅)`.
pub fn intersect_all<I>(results: I) -> Result<Authorization>
where
    I: IntoIterator<Item = Authorization>,
{
    let mut results = results.into_iter();
    let mut acc = results.next().ok_or(FilterError::NoActions)?;

    for next in results {
        if acc.is_empty() {
            debug!("intersection already empty, skipping remaining actions");
            break;
        }
        acc = acc.intersect(next);
    }

    Ok(acc)
}
