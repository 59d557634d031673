//! Dependency extraction: outline → direct child → parent edges

use tracing::debug;

use super::DependencyGraph;
use crate::tree::{Node, Outline};

/// Builder that walks outline trees and accumulates direct dependencies
///
/// Each child depends on its immediate parent. Every visited name becomes a
/// graph key, so the root is present with an empty dependency set. Names
/// repeated at different positions share one entry.
#[derive(Debug, Default)]
pub struct DependencyExtractor {
    graph: DependencyGraph,
}

impl DependencyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a subtree depth-first, parent before children
    pub fn visit(&mut self, root: &Node) -> &mut Self {
        for node in root.iter() {
            self.graph.add_node(&node.name);
            for child in &node.children {
                self.graph.add_dependency(&child.name, &node.name);
            }
        }
        self
    }

    pub fn visit_outline(&mut self, outline: &Outline) -> &mut Self {
        if let Some(root) = &outline.root {
            self.visit(root);
        }
        self
    }

    pub fn finish(self) -> DependencyGraph {
        debug!(
            names = self.graph.len(),
            edges = self.graph.edge_count(),
            "extracted direct dependencies"
        );
        self.graph
    }
}

/// Extract the direct dependency graph of an outline
pub fn extract(outline: &Outline) -> DependencyGraph {
    let mut extractor = DependencyExtractor::new();
    extractor.visit_outline(outline);
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn deps_of<'g>(graph: &'g DependencyGraph, name: &str) -> Vec<&'g str> {
        graph
            .dependencies(name)
            .map(|set| set.iter().map(|s| &**s).collect())
            .unwrap_or_default()
    }

    #[test]
    fn child_depends_on_parent() {
        let outline = parse("a\n  b\n  c\n    d\n    e\n  f\n    g\n").unwrap();
        let graph = extract(&outline);

        assert_eq!(deps_of(&graph, "a"), Vec::<&str>::new());
        assert_eq!(deps_of(&graph, "b"), vec!["a"]);
        assert_eq!(deps_of(&graph, "c"), vec!["a"]);
        assert_eq!(deps_of(&graph, "d"), vec!["c"]);
        assert_eq!(deps_of(&graph, "e"), vec!["c"]);
        assert_eq!(deps_of(&graph, "f"), vec!["a"]);
        assert_eq!(deps_of(&graph, "g"), vec!["f"]);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn keys_follow_preorder_discovery() {
        let outline = parse("a\n  b\n  c\n    d\n    e\n  f\n    g\n").unwrap();
        let graph = extract(&outline);
        let keys: Vec<&str> = graph.names().map(|s| &**s).collect();
        assert_eq!(keys, vec!["a", "b", "c", "f", "d", "e", "g"]);
    }

    #[test]
    fn empty_outline_gives_empty_graph() {
        let graph = extract(&Outline::empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn single_root_is_a_key() {
        let graph = extract(&Outline::new(Node::new("solo")));
        assert_eq!(graph.len(), 1);
        assert!(graph.dependencies("solo").unwrap().is_empty());
    }

    #[test]
    fn duplicate_names_merge() {
        let outline = parse("a\n  b\n    x\n  c\n    x\n").unwrap();
        let graph = extract(&outline);
        assert_eq!(deps_of(&graph, "x"), vec!["b", "c"]);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn extractor_accumulates_across_visits() {
        let mut extractor = DependencyExtractor::new();
        extractor
            .visit(&Node::with_children("a", vec![Node::new("b")]))
            .visit(&Node::with_children("c", vec![Node::new("b")]));
        let graph = extractor.finish();
        assert_eq!(deps_of(&graph, "b"), vec!["a", "c"]);
    }

    #[test]
    fn input_tree_is_untouched() {
        let outline = parse("a\n  b\n").unwrap();
        let before = outline.clone();
        let _ = extract(&outline);
        assert_eq!(outline, before);
    }
}
