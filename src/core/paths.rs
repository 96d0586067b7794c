//! Dependency path enumeration

use crate::models::dependency_graph::{DependencyGraph, EdgeKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// Every simple path between connected module pairs, keyed `source->target`.
///
/// One depth-first search per source walks all simple paths leaving it and
/// records the path under each node it reaches. Paths follow edge direction,
/// so the first element is always upstream of the last. Paths of one pair are
/// ordered by length, then lexicographically.
///
/// Like cycle enumeration this is exponential in dense graphs.
pub fn find_paths(graph: &DependencyGraph) -> BTreeMap<String, Vec<Vec<String>>> {
    let (pg, index) = graph.to_petgraph();
    let mut paths: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();

    for &start in index.values() {
        let mut path = vec![start];
        let mut on_path = BTreeSet::from([start]);
        walk(&pg, start, &mut path, &mut on_path, &mut paths);
    }

    for found in paths.values_mut() {
        found.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    }

    tracing::debug!(pairs = paths.len(), "dependency paths enumerated");
    paths
}

fn walk(
    pg: &DiGraph<String, EdgeKind>,
    current: NodeIndex,
    path: &mut Vec<NodeIndex>,
    on_path: &mut BTreeSet<NodeIndex>,
    paths: &mut BTreeMap<String, Vec<Vec<String>>>,
) {
    let mut next: Vec<NodeIndex> = pg
        .neighbors_directed(current, Direction::Outgoing)
        .filter(|n| !on_path.contains(n))
        .collect();
    next.sort_by(|a, b| pg[*a].cmp(&pg[*b]));
    next.dedup();

    for neighbor in next {
        path.push(neighbor);
        on_path.insert(neighbor);

        let ids: Vec<String> = path.iter().map(|n| pg[*n].clone()).collect();
        paths
            .entry(format!("{}->{}", pg[path[0]], pg[neighbor]))
            .or_default()
            .push(ids);
        walk(pg, neighbor, path, on_path, paths);

        on_path.remove(&neighbor);
        path.pop();
    }
}
