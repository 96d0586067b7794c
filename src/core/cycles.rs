//! Simple-cycle enumeration

use crate::models::analysis::Cycle;
use crate::models::dependency_graph::{DependencyGraph, EdgeKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::BTreeSet;

/// Find every simple cycle in the graph.
///
/// Strongly connected components come from Tarjan's algorithm; components
/// with a single node cannot hold a cycle because self edges are never
/// stored. Inside each component a depth-first search starts from every node
/// `s` and only visits nodes greater than `s`, so each cycle is found once,
/// already rotated to its smallest id.
///
/// The number of simple cycles is exponential in the worst case (dense
/// components), which is acceptable for trees of tens of modules.
///
/// Cycles are ordered by length, then lexicographically.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let (pg, _) = graph.to_petgraph();
    let mut found: BTreeSet<Cycle> = BTreeSet::new();

    for component in tarjan_scc(&pg) {
        if component.len() < 2 {
            continue;
        }

        // Work in id order so "greater than" is the lexicographic order of ids
        let mut nodes: Vec<NodeIndex> = component;
        nodes.sort_by(|a, b| pg[*a].cmp(&pg[*b]));
        let members: BTreeSet<NodeIndex> = nodes.iter().copied().collect();

        for &start in &nodes {
            let mut path = vec![start];
            let mut on_path = BTreeSet::from([start]);
            search(&pg, start, start, &members, &mut path, &mut on_path, &mut found);
        }
    }

    let mut cycles: Vec<Cycle> = found.into_iter().collect();
    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    tracing::debug!(cycles = cycles.len(), "cycle detection finished");
    cycles
}

fn search(
    pg: &DiGraph<String, EdgeKind>,
    start: NodeIndex,
    current: NodeIndex,
    members: &BTreeSet<NodeIndex>,
    path: &mut Vec<NodeIndex>,
    on_path: &mut BTreeSet<NodeIndex>,
    found: &mut BTreeSet<Cycle>,
) {
    let mut next: Vec<NodeIndex> = pg
        .neighbors_directed(current, Direction::Outgoing)
        .filter(|n| members.contains(n))
        .collect();
    next.sort_by(|a, b| pg[*a].cmp(&pg[*b]));
    next.dedup();

    for neighbor in next {
        if neighbor == start {
            let ids = path.iter().map(|n| pg[*n].clone()).collect();
            found.insert(Cycle::from_members(ids));
        } else if pg[neighbor] > pg[start] && !on_path.contains(&neighbor) {
            path.push(neighbor);
            on_path.insert(neighbor);
            search(pg, start, neighbor, members, path, on_path, found);
            on_path.remove(&neighbor);
            path.pop();
        }
    }
}
