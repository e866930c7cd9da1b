//! Parent-chain resolution.
//!
//! Walks a model's `parent` identifiers, linking each model to its parent
//! node. Missing parents and cycles degrade to "no parent" with a warning; a
//! parent that is not a JSON model is a fatal structural error. Links are
//! memoized: a model whose parent is already linked ends the walk.

use super::{ModelGraph, NodeId};
use crate::error::{ModelError, Result};
use crate::types::Identifier;
use log::warn;
use std::fmt;

/// A recoverable problem found while walking a parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphAnomaly {
    /// The named parent is not registered.
    MissingParent { model: Identifier, parent: Identifier },
    /// The parent was already visited during this walk.
    Cycle {
        model: Identifier,
        chain: Vec<Identifier>,
        parent: Identifier,
    },
    /// Child and parent extension payloads have different versions.
    VersionMismatch {
        model: Identifier,
        version: u32,
        parent: Identifier,
        parent_version: u32,
    },
}

impl fmt::Display for GraphAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphAnomaly::MissingParent { model, parent } => {
                write!(f, "No parent '{}' while loading model '{}'", parent, model)
            }
            GraphAnomaly::Cycle {
                model,
                chain,
                parent,
            } => {
                let chain: Vec<&str> = chain.iter().map(Identifier::as_str).collect();
                write!(
                    f,
                    "Found 'parent' loop while loading model '{}' in chain: {} -> {}",
                    model,
                    chain.join(" -> "),
                    parent
                )
            }
            GraphAnomaly::VersionMismatch {
                model,
                version,
                parent,
                parent_version,
            } => write!(
                f,
                "Model {} is v{}, but its parent ({}) is v{}",
                model, version, parent, parent_version
            ),
        }
    }
}

/// Outcome of one parent-chain walk.
#[derive(Debug, Clone, Default)]
pub struct ParentChain {
    /// Nodes in walk order, starting with the walked node.
    pub visited: Vec<NodeId>,
    /// Warnings raised during the walk, in order.
    pub anomalies: Vec<GraphAnomaly>,
}

impl ParentChain {
    pub fn has_cycle(&self) -> bool {
        self.anomalies
            .iter()
            .any(|a| matches!(a, GraphAnomaly::Cycle { .. }))
    }
}

/// Resolve the unresolved part of `start`'s parent chain.
///
/// Links found during the walk are applied once it finishes. When the walk
/// runs into a cycle, no member of the cycle is linked, so the cycle stays
/// unresolved while nodes leading into it keep their links.
pub fn resolve_parent_chain(graph: &mut ModelGraph, start: NodeId) -> Result<ParentChain> {
    let mut chain = ParentChain::default();
    let mut pending: Vec<(NodeId, NodeId)> = Vec::new();
    let mut current = start;

    loop {
        let Some(model) = graph.json(current) else {
            break;
        };
        let Some(parent_id) = model.parent_location() else {
            break;
        };
        if model.parent_link().is_some() {
            break;
        }

        chain.visited.push(current);

        let Some(candidate) = graph.lookup(&parent_id) else {
            let anomaly = GraphAnomaly::MissingParent {
                model: graph.id(current).clone(),
                parent: parent_id,
            };
            warn!("{}", anomaly);
            chain.anomalies.push(anomaly);
            break;
        };

        if let Some(cycle_start) = chain.visited.iter().position(|&n| n == candidate) {
            let anomaly = GraphAnomaly::Cycle {
                model: graph.id(current).clone(),
                chain: chain.visited.iter().map(|&n| graph.id(n).clone()).collect(),
                parent: parent_id,
            };
            warn!("{}", anomaly);
            chain.anomalies.push(anomaly);

            let cycle = &chain.visited[cycle_start..];
            pending.retain(|(child, _)| !cycle.contains(child));
            break;
        }

        if graph.json(candidate).is_none() {
            return Err(ModelError::ParentKind {
                model: graph.id(current).to_string(),
                parent: parent_id.to_string(),
            });
        }

        pending.push((current, candidate));
        current = candidate;
    }

    if chain.visited.last() != Some(&current) {
        chain.visited.push(current);
    }

    for (child, parent) in pending {
        if let Some(anomaly) = graph.link_parent(child, parent) {
            chain.anomalies.push(anomaly);
        }
    }

    Ok(chain)
}
