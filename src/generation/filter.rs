//! Operation filtering
//!
//! An operation is retained iff it is not an excluded deprecated operation,
//! carries at least one included tag (when a tag filter is set) and its path
//! matches at least one include pattern (when a path filter is set).

use regex::Regex;

use crate::generation::{GenerationError, Operation};

/// Selection rules applied to the document's operations
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// OR-combined, exact and case-sensitive
    pub include_tags: Vec<String>,
    /// OR-combined, unanchored
    pub include_paths: Vec<Regex>,
    pub exclude_deprecated: bool,
}

impl FilterCriteria {
    /// True when no criterion is set and every operation passes
    pub fn is_empty(&self) -> bool {
        self.include_tags.is_empty() && self.include_paths.is_empty() && !self.exclude_deprecated
    }

    pub fn matches(&self, operation: &Operation) -> bool {
        if self.exclude_deprecated && operation.deprecated {
            return false;
        }

        let tag_ok = self.include_tags.is_empty()
            || operation
                .tags
                .iter()
                .any(|tag| self.include_tags.contains(tag));

        let path_ok = self.include_paths.is_empty()
            || self
                .include_paths
                .iter()
                .any(|pattern| pattern.is_match(&operation.path));

        tag_ok && path_ok
    }
}

/// Retain matching operations in their original order.
///
/// Fails with [`GenerationError::EmptySelection`] when nothing is left.
pub fn filter_operations<'a, I>(
    operations: I,
    criteria: &FilterCriteria,
) -> Result<Vec<&'a Operation>, GenerationError>
where
    I: IntoIterator<Item = &'a Operation>,
{
    let retained: Vec<&Operation> = operations
        .into_iter()
        .filter(|operation| criteria.matches(operation))
        .collect();

    tracing::debug!("Filter retained {} operations", retained.len());

    if retained.is_empty() {
        return Err(GenerationError::EmptySelection);
    }
    Ok(retained)
}
