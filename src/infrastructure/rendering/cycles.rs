//! Recursive contract detection
//!
//! A Rust value has a fixed size, so a contract that contains itself through
//! by-value members needs a `Box` on that path. The graph here only has
//! by-value embeddings: plain field types, union members, base types and,
//! for a polymorphic target, every variant of its `Kind` enum. `Vec` and
//! `HashMap` already allocate, so array items and map values add no edge.
//!
//! Strongly connected components come from `petgraph`'s Tarjan. Any member
//! pointing back into its own component is boxed.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::generation::{ContractDefinition, ContractSet, SchemaKind, TypeRef};

#[derive(Debug, Clone, Default)]
pub struct RecursionGroups {
    /// Contract id to component index
    component: HashMap<String, usize>,
    /// Polymorphic contract id to every id its `Kind` enum embeds
    variants: HashMap<String, Vec<String>>,
}

impl RecursionGroups {
    pub fn new(contracts: &ContractSet) -> Self {
        let variants: HashMap<String, Vec<String>> = contracts
            .contracts
            .iter()
            .filter_map(|contract| {
                contract.polymorphism.as_ref().map(|polymorphism| {
                    let ids = std::iter::once(contract.id.clone())
                        .chain(polymorphism.derived.iter().map(|d| d.id.clone()))
                        .collect();
                    (contract.id.clone(), ids)
                })
            })
            .collect();

        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let nodes: HashMap<&str, NodeIndex> = contracts
            .contracts
            .iter()
            .map(|contract| (contract.id.as_str(), graph.add_node(contract.id.as_str())))
            .collect();

        for contract in &contracts.contracts {
            let from = nodes[contract.id.as_str()];
            for id in embedded_ids(contract, &variants) {
                if let Some(&to) = nodes.get(id.as_str()) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        let mut component = HashMap::new();
        for (position, members) in tarjan_scc(&graph).into_iter().enumerate() {
            for node in members {
                component.insert(graph[node].to_string(), position);
            }
        }

        tracing::debug!(
            "Contract reference graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { component, variants }
    }

    /// Whether a by-value member of `owner` typed `type_ref` leads back to
    /// `owner`
    pub fn needs_box(&self, owner: &str, type_ref: &TypeRef) -> bool {
        let TypeRef::Named(target) = type_ref else {
            return false;
        };
        let Some(own) = self.component.get(owner) else {
            return false;
        };

        self.targets(target)
            .into_iter()
            .any(|id| self.component.get(id) == Some(own))
    }

    fn targets<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        match self.variants.get(id) {
            Some(ids) => ids.iter().map(String::as_str).collect(),
            None => vec![id],
        }
    }
}

/// Ids a contract holds by value
fn embedded_ids<'a>(
    contract: &'a ContractDefinition,
    variants: &'a HashMap<String, Vec<String>>,
) -> impl Iterator<Item = String> + 'a {
    let members: Vec<&TypeRef> = match &contract.kind {
        SchemaKind::Object => contract.fields.iter().map(|f| &f.type_ref).collect(),
        SchemaKind::Union(members) => members.iter().collect(),
        _ => Vec::new(),
    };

    let direct = members.into_iter().filter_map(|type_ref| match type_ref {
        TypeRef::Named(id) => Some(id),
        _ => None,
    });

    direct
        .flat_map(move |id| match variants.get(id) {
            Some(ids) => ids.clone(),
            None => vec![id.clone()],
        })
        .chain(contract.base.iter().cloned())
}
