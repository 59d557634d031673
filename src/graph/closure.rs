//! Transitive closure in one topological pass
//!
//! Names are processed in a topological order of the direct-edge graph, so
//! every dependency of `k` is already closed when `k` is reached and a
//! single merge per dependency is enough.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{toposort, DependencyGraph, NameSet};
use crate::error::{Diagnostic, Result};

/// Expand every dependency set to its transitive closure, in place.
///
/// Dependencies that are not graph keys add nothing further; each one is
/// returned as an [`Diagnostic::UnknownNameReference`] against the name
/// that references it without inheriting it. Fails with `CycleDetected`
/// (leaving the graph untouched) if no topological order exists. Closing an
/// already closed graph changes nothing and reports the same diagnostics.
pub fn close(graph: &mut DependencyGraph) -> Result<Vec<Diagnostic>> {
    let order = toposort::order(graph)?;
    let mut diagnostics = Vec::new();
    let mut merged = 0usize;

    for name in &order {
        let Some(idx) = graph.index_of(name) else {
            // Value-only name: nothing to expand
            continue;
        };

        let current: Vec<Arc<str>> = graph.set_at(idx).iter().cloned().collect();
        let mut additions = NameSet::new();
        let mut unknown: Vec<&Arc<str>> = Vec::new();
        for dep in &current {
            match graph.index_of(dep) {
                Some(dep_idx) => additions.extend(graph.set_at(dep_idx).iter().cloned()),
                None => unknown.push(dep),
            }
        }

        // Unknown names inherited from a dependency were reported where they originate
        for dep in unknown.into_iter().filter(|dep| !additions.contains(&***dep)) {
            warn!(missing = %dep, referenced_by = %name, "dependency on unknown name");
            diagnostics.push(Diagnostic::UnknownNameReference {
                name: dep.to_string(),
                referenced_by: name.to_string(),
            });
        }

        let set = graph.set_at_mut(idx);
        let before = set.len();
        set.extend(additions);
        merged += set.len() - before;
    }

    debug!(
        names = graph.len(),
        added = merged,
        "closed dependency graph"
    );
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutplanError;
    use crate::graph::extract;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn deps_of<'g>(graph: &'g DependencyGraph, name: &str) -> Vec<&'g str> {
        graph
            .dependencies(name)
            .map(|set| set.iter().map(|s| &**s).collect())
            .unwrap_or_default()
    }

    fn closed(text: &str) -> DependencyGraph {
        let mut graph = extract(&parse(text).unwrap());
        let diagnostics = close(&mut graph).unwrap();
        assert!(diagnostics.is_empty());
        graph
    }

    #[test]
    fn closes_sibling_subtrees() {
        let graph = closed("a\n  b\n  c\n    d\n    e\n  f\n    g\n");
        assert_eq!(deps_of(&graph, "g"), vec!["f", "a"]);
        assert_eq!(deps_of(&graph, "d"), vec!["c", "a"]);
        assert_eq!(deps_of(&graph, "e"), vec!["c", "a"]);
        assert_eq!(deps_of(&graph, "b"), vec!["a"]);
        assert_eq!(deps_of(&graph, "c"), vec!["a"]);
        assert_eq!(deps_of(&graph, "f"), vec!["a"]);
        assert!(deps_of(&graph, "a").is_empty());
    }

    #[test]
    fn closes_multi_level_chain() {
        let graph = closed("a\n  b\n  c\n  f\n  g\n    x\n      y\n");
        assert_eq!(deps_of(&graph, "y"), vec!["x", "g", "a"]);
        assert_eq!(deps_of(&graph, "x"), vec!["g", "a"]);
    }

    #[test]
    fn closure_is_idempotent() {
        let mut graph = closed("a\n  b\n    c\n      d\n  e\n");
        let once = graph.clone();
        close(&mut graph).unwrap();
        assert_eq!(graph, once);
        // Same iteration order as well
        let a: Vec<_> = once.iter().collect();
        let b: Vec<_> = graph.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn closure_does_not_depend_on_key_order() {
        // Keys inserted deepest-first still close correctly
        let mut graph: DependencyGraph = [
            ("d", &["c"][..]),
            ("c", &["b"][..]),
            ("b", &["a"][..]),
            ("a", &[][..]),
        ]
        .into_iter()
        .collect();
        close(&mut graph).unwrap();
        assert_eq!(deps_of(&graph, "d"), vec!["c", "b", "a"]);
    }

    #[test]
    fn unknown_names_are_reported_not_expanded() {
        let mut graph: DependencyGraph =
            [("b", &["ghost"][..]), ("c", &["b"][..])].into_iter().collect();
        let diagnostics = close(&mut graph).unwrap();
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnknownNameReference {
                name: "ghost".to_string(),
                referenced_by: "b".to_string(),
            }]
        );
        assert_eq!(deps_of(&graph, "c"), vec!["b", "ghost"]);
    }

    #[test]
    fn reclosing_reports_the_same_unknown_names() {
        let mut graph: DependencyGraph = [
            ("b", &["ghost"][..]),
            ("c", &["b"][..]),
            ("d", &["c"][..]),
        ]
        .into_iter()
        .collect();
        let first = close(&mut graph).unwrap();
        let closed = graph.clone();
        let second = close(&mut graph).unwrap();

        assert_eq!(second, first);
        assert_eq!(first.len(), 1);
        assert_eq!(graph, closed);
        assert_eq!(deps_of(&graph, "d"), vec!["c", "b", "ghost"]);
    }

    #[test]
    fn cycle_is_rejected_and_graph_untouched() {
        let mut graph: DependencyGraph = [
            ("a", &["b"][..]),
            ("b", &["c"][..]),
            ("c", &["a"][..]),
            ("d", &["a"][..]),
        ]
        .into_iter()
        .collect();
        let before = graph.clone();
        let err = close(&mut graph).unwrap_err();
        assert!(matches!(err, OutplanError::CycleDetected { .. }));
        assert_eq!(graph, before);
    }

    #[test]
    fn repeated_ancestor_name_is_a_cycle() {
        let mut graph = extract(&parse("a\n  b\n    a\n").unwrap());
        assert!(matches!(
            close(&mut graph),
            Err(OutplanError::CycleDetected { .. })
        ));
    }

    #[test]
    fn empty_graph_closes_to_empty() {
        let mut graph = DependencyGraph::new();
        assert!(close(&mut graph).unwrap().is_empty());
        assert!(graph.is_empty());
    }
}
