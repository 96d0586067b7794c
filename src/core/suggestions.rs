//! Refactoring suggestions for breaking cycles

use crate::models::analysis::{Cycle, CycleSuggestions, Suggestion, SuggestionKind};
use crate::models::dependency_graph::{DependencyGraph, EdgeKind};
use crate::utils::path_resolver;
use std::collections::BTreeSet;

/// Suggestions for every cycle, in cycle order
pub fn suggest_all(graph: &DependencyGraph, cycles: &[Cycle]) -> Vec<CycleSuggestions> {
    cycles
        .iter()
        .map(|cycle| CycleSuggestions {
            cycle: cycle.clone(),
            suggestions: suggest(graph, cycle),
        })
        .collect()
}

/// Apply the fixed rule set to one cycle
pub fn suggest(graph: &DependencyGraph, cycle: &Cycle) -> Vec<Suggestion> {
    let mut suggestions = vec![extract_common_dependency(graph, cycle)];
    if let Some(indirect) = indirect_lookup(graph, cycle) {
        suggestions.push(indirect);
    }
    suggestions.push(restructure(cycle));
    suggestions
}

fn extract_common_dependency(graph: &DependencyGraph, cycle: &Cycle) -> Suggestion {
    let members: BTreeSet<String> = cycle.members().iter().cloned().collect();
    let listed = cycle.members().join(", ");

    let shared = cycle
        .members()
        .iter()
        .map(|id| graph.upstream(id))
        .reduce(|acc, next| acc.intersection(&next).cloned().collect())
        .unwrap_or_default();
    let shared: Vec<String> = shared.difference(&members).cloned().collect();

    if !shared.is_empty() {
        return Suggestion {
            kind: SuggestionKind::ExtractCommonDependency,
            modules: shared.clone(),
            message: format!(
                "{} already share the upstream dependency {}; move the values they exchange \
                 into it, or into a new module beside it, so no member needs another member's outputs",
                listed,
                shared.join(", ")
            ),
        };
    }

    let exchanged = exchanged_outputs(graph, cycle);
    let message = if exchanged.is_empty() {
        format!(
            "Extract the configuration that {} exchange into a new module they all depend on",
            listed
        )
    } else {
        format!(
            "Extract the outputs {} into a new module that {} all depend on",
            exchanged.iter().cloned().collect::<Vec<_>>().join(", "),
            listed
        )
    };

    Suggestion {
        kind: SuggestionKind::ExtractCommonDependency,
        modules: cycle.members().to_vec(),
        message,
    }
}

/// `module.output` pairs read across the edges of the cycle
fn exchanged_outputs(graph: &DependencyGraph, cycle: &Cycle) -> BTreeSet<String> {
    let mut exchanged = BTreeSet::new();

    for (from, to) in cycle.edges() {
        let Some(consumer) = graph.module(to) else {
            continue;
        };
        let mut names: BTreeSet<&str> = BTreeSet::from([path_resolver::basename(from)]);
        names.extend(
            consumer
                .declarations
                .iter()
                .filter(|d| d.target.as_deref() == Some(from))
                .filter_map(|d| d.name.as_deref()),
        );

        for reference in &consumer.references {
            if names.contains(reference.name.as_str()) {
                exchanged.insert(format!("{}.{}", from, reference.attribute));
            }
        }
    }

    exchanged
}

fn indirect_lookup(graph: &DependencyGraph, cycle: &Cycle) -> Option<Suggestion> {
    let (from, to, kind) = cycle
        .edges()
        .into_iter()
        .filter_map(|(from, to)| graph.edge(from, to).map(|e| (from, to, e.kind)))
        .min_by(|a, b| {
            (a.2 != EdgeKind::Inferred, a.0, a.1).cmp(&(b.2 != EdgeKind::Inferred, b.0, b.1))
        })?;

    let kind = match kind {
        EdgeKind::Explicit => "declared",
        EdgeKind::Inferred => "inferred",
    };

    Some(Suggestion {
        kind: SuggestionKind::IndirectLookup,
        modules: vec![from.to_string(), to.to_string()],
        message: format!(
            "Replace the {} edge {} -> {} with an indirect lookup: let {} read the value from \
             remote state or a published parameter instead of a live reference to {}",
            kind, from, to, to, from
        ),
    })
}

fn restructure(cycle: &Cycle) -> Suggestion {
    let members = cycle.members();
    if let [a, b] = members {
        return Suggestion {
            kind: SuggestionKind::Restructure,
            modules: vec![a.clone(), b.clone()],
            message: format!(
                "{} and {} depend on each other; restructure them so only one needs to know about the other",
                a, b
            ),
        };
    }

    let (from, to) = cycle.closing_edge().unwrap_or_default();
    Suggestion {
        kind: SuggestionKind::Restructure,
        modules: vec![from.to_string(), to.to_string()],
        message: format!(
            "The edge {} -> {} closes the loop; restructure {} so it no longer depends on {}",
            from, to, to, from
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::module::{Module, Reference, ReferenceVia};

    fn graph(edges: &[(&str, &str, EdgeKind)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        let ids: BTreeSet<&str> = edges.iter().flat_map(|(a, b, _)| [*a, *b]).collect();
        for id in ids {
            graph.add_module(Module::new(id, id));
        }
        for (from, to, kind) in edges {
            graph.add_edge(from, to, *kind);
        }
        graph
    }

    fn cycle(ids: &[&str]) -> Cycle {
        Cycle::from_members(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_two_cycle_gets_all_three_rules() {
        let g = graph(&[
            ("ec2", "vpc", EdgeKind::Inferred),
            ("vpc", "ec2", EdgeKind::Explicit),
        ]);
        let suggestions = suggest(&g, &cycle(&["ec2", "vpc"]));

        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::ExtractCommonDependency,
                SuggestionKind::IndirectLookup,
                SuggestionKind::Restructure,
            ]
        );
        // the inferred edge is the weakest
        assert_eq!(suggestions[1].modules, vec!["ec2", "vpc"]);
        assert!(suggestions[1].message.contains("inferred edge ec2 -> vpc"));
        assert!(suggestions[2].message.starts_with("ec2 and vpc"));
    }

    #[test]
    fn test_weakest_edge_falls_back_to_lexicographic() {
        let g = graph(&[
            ("a", "b", EdgeKind::Explicit),
            ("b", "c", EdgeKind::Explicit),
            ("c", "a", EdgeKind::Explicit),
        ]);
        let suggestions = suggest(&g, &cycle(&["a", "b", "c"]));

        assert_eq!(suggestions[1].modules, vec!["a", "b"]);
        assert_eq!(suggestions[2].modules, vec!["c", "a"]);
        assert!(suggestions[2].message.contains("c -> a closes the loop"));
    }

    #[test]
    fn test_shared_upstream_is_named() {
        let g = graph(&[
            ("vpc", "a", EdgeKind::Explicit),
            ("vpc", "b", EdgeKind::Explicit),
            ("a", "b", EdgeKind::Explicit),
            ("b", "a", EdgeKind::Explicit),
        ]);
        let first = &suggest(&g, &cycle(&["a", "b"]))[0];
        assert_eq!(first.modules, vec!["vpc"]);
        assert!(first.message.contains("upstream dependency vpc"));
    }

    #[test]
    fn test_exchanged_outputs_are_listed() {
        let mut g = DependencyGraph::new();
        let mut vpc = Module::new("vpc", "vpc");
        vpc.references.insert(Reference {
            via: ReferenceVia::Module,
            name: "ec2".into(),
            attribute: "instance_id".into(),
            expression: "module.ec2.instance_id".into(),
        });
        let mut ec2 = Module::new("ec2", "ec2");
        ec2.references.insert(Reference {
            via: ReferenceVia::Dependency,
            name: "vpc".into(),
            attribute: "vpc_id".into(),
            expression: "dependency.vpc.outputs.vpc_id".into(),
        });
        g.add_module(vpc);
        g.add_module(ec2);
        g.add_edge("vpc", "ec2", EdgeKind::Explicit);
        g.add_edge("ec2", "vpc", EdgeKind::Inferred);

        let first = &suggest(&g, &cycle(&["vpc", "ec2"]))[0];
        assert!(first.message.contains("ec2.instance_id, vpc.vpc_id"), "{}", first.message);
    }
}
