//! Dependency graph - name → set of names it depends on
//!
//! - `extract`: builds direct child → parent edges from an outline
//! - `closure`: expands direct edges into the transitive closure, in place
//! - `toposort`: orders every name after all of its dependencies
//!
//! Backed by IndexMap/IndexSet so iteration follows first-seen order and
//! every plan is reproducible for the same input.

mod closure;
mod extract;
mod toposort;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{OutplanError, Result};

pub use closure::close;
pub use extract::{extract, DependencyExtractor};
pub use toposort::{levels, order};

/// Dependencies of one name, in first-seen order
pub type NameSet = IndexSet<Arc<str>>;

/// Mapping from each name to the names it depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    deps: IndexMap<Arc<str>, NameSet>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse the stored Arc for a known name
    fn intern(&self, name: &str) -> Arc<str> {
        self.deps
            .get_key_value(name)
            .map(|(k, _)| Arc::clone(k))
            .unwrap_or_else(|| Arc::from(name))
    }

    /// Register a name with no dependencies (no-op if already present)
    pub fn add_node(&mut self, name: &str) {
        if !self.deps.contains_key(name) {
            self.deps.insert(Arc::from(name), NameSet::new());
        }
    }

    /// Record `name` depends on `dependency`
    ///
    /// Only `name` becomes a key; `dependency` is stored as a value.
    pub fn add_dependency(&mut self, name: &str, dependency: &str) {
        let dep = self.intern(dependency);
        match self.deps.get_mut(name) {
            Some(set) => {
                set.insert(dep);
            }
            None => {
                let mut set = NameSet::new();
                set.insert(dep);
                self.deps.insert(Arc::from(name), set);
            }
        }
    }

    /// Dependencies of a name, if it is a key
    #[inline]
    pub fn dependencies(&self, name: &str) -> Option<&NameSet> {
        self.deps.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.deps.contains_key(name)
    }

    /// Whether `name` has `dependency` in its set
    pub fn depends_on(&self, name: &str, dependency: &str) -> bool {
        self.deps
            .get(name)
            .is_some_and(|set| set.contains(dependency))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Number of (name, dependency) pairs
    pub fn edge_count(&self) -> usize {
        self.deps.values().map(IndexSet::len).sum()
    }

    /// Keys in insertion order
    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.deps.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &NameSet)> {
        self.deps.iter()
    }

    /// Every name in the graph: keys first, then names that only appear as
    /// dependencies, each group in first-seen order
    pub fn all_names(&self) -> NameSet {
        let mut all: NameSet = self.deps.keys().cloned().collect();
        for set in self.deps.values() {
            for dep in set {
                if !all.contains(dep) {
                    all.insert(Arc::clone(dep));
                }
            }
        }
        all
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.deps.get_index_of(name)
    }

    pub(crate) fn set_at(&self, index: usize) -> &NameSet {
        &self.deps[index]
    }

    pub(crate) fn set_at_mut(&mut self, index: usize) -> &mut NameSet {
        &mut self.deps[index]
    }

    /// Detect cycles using DFS with three-color marking.
    ///
    /// Returns `Err(OutplanError::CycleDetected)` with the cycle path, e.g.
    /// `a → b → a` (a depends on b, b depends on a).
    pub fn detect_cycles(&self) -> Result<()> {
        match self.find_cycle() {
            Some(cycle) => Err(OutplanError::CycleDetected { cycle }),
            None => Ok(()),
        }
    }

    /// First cycle in key order, as `a → b → a`
    ///
    /// Iterative so long dependency chains cannot exhaust the call stack.
    pub(crate) fn find_cycle(&self) -> Option<String> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut colors: FxHashMap<&str, Color> = self
            .deps
            .keys()
            .map(|k| (&**k, Color::White))
            .collect();
        // Gray names from the search root down, with their unvisited dependencies
        let mut path: Vec<&str> = Vec::new();
        let mut frames: Vec<indexmap::set::Iter<'_, Arc<str>>> = Vec::new();

        for (name, deps) in self.deps.iter() {
            if colors.get(&**name) != Some(&Color::White) {
                continue;
            }
            colors.insert(&**name, Color::Gray);
            path.push(&**name);
            frames.push(deps.iter());

            while let Some(neighbors) = frames.last_mut() {
                let Some(neighbor) = neighbors.next() else {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        colors.insert(done, Color::Black);
                    }
                    continue;
                };

                match colors.get(&**neighbor).copied() {
                    Some(Color::Gray) => {
                        let start = path
                            .iter()
                            .position(|x| *x == &**neighbor)
                            .unwrap_or(0);
                        return Some(format!("{} → {}", path[start..].join(" → "), neighbor));
                    }
                    Some(Color::White) => {
                        // White names are always keys
                        if let Some(set) = self.deps.get(&**neighbor) {
                            colors.insert(&**neighbor, Color::Gray);
                            path.push(&**neighbor);
                            frames.push(set.iter());
                        }
                    }
                    // Finished, or a value-only name with nothing to follow
                    Some(Color::Black) | None => {}
                }
            }
        }
        None
    }
}

impl<'a> FromIterator<(&'a str, &'a [&'a str])> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a [&'a str])>>(iter: I) -> Self {
        let mut graph = DependencyGraph::new();
        for (name, deps) in iter {
            graph.add_node(name);
            for dep in deps {
                graph.add_dependency(name, dep);
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&'static str, &'static [&'static str])]) -> DependencyGraph {
        edges.iter().copied().collect()
    }

    #[test]
    fn add_dependency_only_keys_the_dependent() {
        let mut g = DependencyGraph::new();
        g.add_dependency("b", "a");
        assert!(g.contains("b"));
        assert!(!g.contains("a"));
        assert!(g.depends_on("b", "a"));
        assert_eq!(g.len(), 1);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn all_names_includes_value_only_names() {
        let g = graph(&[("c", &["b"]), ("b", &["a"])]);
        let names = g.all_names();
        let all: Vec<&str> = names.iter().map(|s| &**s).collect();
        assert_eq!(all, vec!["c", "b", "a"]);
    }

    #[test]
    fn dependency_arcs_are_shared_with_keys() {
        let mut g = DependencyGraph::new();
        g.add_node("a");
        g.add_dependency("b", "a");
        let key = g.names().next().unwrap();
        let dep = g.dependencies("b").unwrap().first().unwrap();
        assert!(Arc::ptr_eq(key, dep));
    }

    #[test]
    fn detect_cycle_simple() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let err = g.detect_cycles().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("OUTPLAN-020"));
        assert!(msg.contains("a → b → c → a"));
    }

    #[test]
    fn self_dependency_is_cycle() {
        let g = graph(&[("a", &["a"])]);
        assert!(g.detect_cycles().is_err());
    }

    #[test]
    fn long_ring_cycle_is_found_without_recursion() {
        let n = 100_000;
        let mut g = DependencyGraph::new();
        for i in 0..n {
            g.add_dependency(&format!("n{}", i), &format!("n{}", (i + 1) % n));
        }
        let cycle = g.find_cycle().unwrap();
        assert!(cycle.starts_with("n0 → n1 → n2"));
        assert!(cycle.ends_with(&format!("n{} → n0", n - 1)));
    }

    #[test]
    fn long_acyclic_chain_is_ok() {
        let n = 100_000;
        let mut g = DependencyGraph::new();
        for i in 1..n {
            g.add_dependency(&format!("n{}", i), &format!("n{}", i - 1));
        }
        assert!(g.detect_cycles().is_ok());
    }

    #[test]
    fn diamond_is_acyclic() {
        let g = graph(&[("d", &["b", "c"]), ("b", &["a"]), ("c", &["a"])]);
        assert!(g.detect_cycles().is_ok());
    }

    #[test]
    fn serializes_as_plain_map() {
        let g = graph(&[("a", &[]), ("b", &["a"])]);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r#"{"a":[],"b":["a"]}"#);
    }
}
