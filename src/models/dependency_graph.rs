//! Module dependency graph

use super::module::Module;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Provenance of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Stated in a `dependency` block or `dependencies.paths`
    Explicit,
    /// Found by pattern matching on expression text
    Inferred,
}

/// `from` is deployed before `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The referenced (upstream) module
    pub from: String,
    /// The referencing (downstream) module
    pub to: String,
    /// Explicit whenever any explicit evidence exists
    pub kind: EdgeKind,
    pub evidence: BTreeSet<EdgeKind>,
}

/// The module graph. Keys are module ids, so iteration order is stable.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: BTreeMap<String, Module>,
    edges: BTreeMap<(String, String), DependencyEdge>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module node, replacing any module with the same id
    pub fn add_module(&mut self, module: Module) {
        self.modules.insert(module.id.clone(), module);
    }

    /// Add an edge, or merge the evidence into the existing one.
    ///
    /// Returns `false` when either endpoint is unknown or the edge is a self
    /// loop; such edges are never stored.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> bool {
        if from == to || !self.modules.contains_key(from) || !self.modules.contains_key(to) {
            return false;
        }

        let edge = self
            .edges
            .entry((from.to_string(), to.to_string()))
            .or_insert_with(|| DependencyEdge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
                evidence: BTreeSet::new(),
            });
        edge.evidence.insert(kind);
        if edge.evidence.contains(&EdgeKind::Explicit) {
            edge.kind = EdgeKind::Explicit;
        }
        true
    }

    pub fn modules(&self) -> &BTreeMap<String, Module> {
        &self.modules
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Edges in `(from, to)` order
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values()
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
        self.edges.get(&(from.to_string(), to.to_string()))
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Modules that must be deployed before `id`
    pub fn upstream(&self, id: &str) -> BTreeSet<String> {
        self.edges
            .values()
            .filter(|e| e.to == id)
            .map(|e| e.from.clone())
            .collect()
    }

    /// Modules that directly consume `id`
    pub fn dependents(&self, id: &str) -> BTreeSet<String> {
        self.edges
            .values()
            .filter(|e| e.from == id)
            .map(|e| e.to.clone())
            .collect()
    }

    /// Every module transitively deployed after `id`, never `id` itself
    pub fn downstream(&self, id: &str) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<String> = self.dependents(id).into_iter().collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for next in self.dependents(&current) {
                if !visited.contains(&next) {
                    queue.push_back(next);
                }
            }
        }

        visited.remove(id);
        visited
    }

    /// Build a petgraph view. Node weights are module ids, inserted in id order.
    pub fn to_petgraph(&self) -> (DiGraph<String, EdgeKind>, BTreeMap<String, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.modules.len(), self.edges.len());
        let mut index = BTreeMap::new();

        for id in self.modules.keys() {
            index.insert(id.clone(), graph.add_node(id.clone()));
        }
        for edge in self.edges.values() {
            if let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) {
                graph.add_edge(a, b, edge.kind);
            }
        }

        (graph, index)
    }

    /// Group modules into deployment layers.
    ///
    /// Layer 0 holds modules without upstream dependencies. When only cyclic
    /// modules remain, the smallest id is forced into the current layer so the
    /// layering always terminates.
    pub fn deployment_layers(&self) -> Vec<Vec<String>> {
        let mut remaining: BTreeMap<&str, BTreeSet<&str>> = self
            .modules
            .keys()
            .map(|id| (id.as_str(), BTreeSet::new()))
            .collect();
        for edge in self.edges.values() {
            if let Some(upstream) = remaining.get_mut(edge.to.as_str()) {
                upstream.insert(edge.from.as_str());
            }
        }

        let mut layers = Vec::new();
        while !remaining.is_empty() {
            let mut layer: Vec<&str> = remaining
                .iter()
                .filter(|(_, upstream)| upstream.is_empty())
                .map(|(id, _)| *id)
                .collect();
            if layer.is_empty() {
                if let Some(first) = remaining.keys().next() {
                    layer.push(*first);
                }
            }

            for id in &layer {
                remaining.remove(id);
            }
            for upstream in remaining.values_mut() {
                for id in &layer {
                    upstream.remove(id);
                }
            }
            layers.push(layer.into_iter().map(str::to_string).collect());
        }

        layers
    }
}
