//! Schema trimming
//!
//! Computes the closure of schemas reachable from the retained operations
//! (plus keep-pattern matches) over the reference graph. Edges are field
//! types, base types, derived types, array items, union members and map
//! values. The traversal is breadth-first with a visited set, so cycles
//! terminate.

use regex::Regex;
use std::collections::{HashMap, VecDeque};

use crate::generation::{GenerationError, Operation, Schema};

#[derive(Debug, Clone, Default)]
pub struct TrimPolicy {
    pub enabled: bool,
    /// Schemas whose identifier matches any pattern are always retained
    pub keep_patterns: Vec<Regex>,
}

/// Returns the retained schemas in document order.
///
/// Every reference followed must resolve to a schema of the document. When
/// trimming is disabled every schema is returned and every schema reference
/// is checked.
pub fn trim_schemas<'a>(
    schemas: &'a [Schema],
    operations: &[&Operation],
    policy: &TrimPolicy,
) -> Result<Vec<&'a Schema>, GenerationError> {
    let index: HashMap<&str, usize> = schemas
        .iter()
        .enumerate()
        .map(|(position, schema)| (schema.id.as_str(), position))
        .collect();

    let lookup = |identifier: &str, referenced_by: &str| {
        index
            .get(identifier)
            .copied()
            .ok_or_else(|| GenerationError::unresolved(identifier, referenced_by))
    };

    // Operation references are validated in both modes
    let mut seeds = Vec::new();
    for operation in operations {
        for identifier in operation.schema_refs() {
            seeds.push(lookup(identifier, &operation.id)?);
        }
    }

    if !policy.enabled {
        for schema in schemas {
            for identifier in schema.references() {
                lookup(identifier, &schema.id)?;
            }
        }
        return Ok(schemas.iter().collect());
    }

    seeds.extend(
        schemas
            .iter()
            .enumerate()
            .filter(|(_, schema)| {
                policy
                    .keep_patterns
                    .iter()
                    .any(|pattern| pattern.is_match(&schema.id))
            })
            .map(|(position, _)| position),
    );

    let mut visited = vec![false; schemas.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for seed in seeds {
        if !visited[seed] {
            visited[seed] = true;
            queue.push_back(seed);
        }
    }

    while let Some(position) = queue.pop_front() {
        let schema = &schemas[position];
        for identifier in schema.references() {
            let next = lookup(identifier, &schema.id)?;
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    let retained: Vec<&Schema> = schemas
        .iter()
        .zip(visited)
        .filter_map(|(schema, keep)| keep.then_some(schema))
        .collect();

    tracing::debug!(
        "Schema trimming retained {} of {} schemas",
        retained.len(),
        schemas.len()
    );
    Ok(retained)
}
