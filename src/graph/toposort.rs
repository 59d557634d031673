//! Topological sort (Kahn's algorithm, by levels)
//!
//! Level 0 holds names with no dependencies; each later level holds names
//! whose dependencies all sit in earlier levels. Within a level, names keep
//! the graph's first-seen order (`DependencyGraph::all_names`), which makes
//! the result deterministic.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::DependencyGraph;
use crate::error::{OutplanError, Result};

/// Group every name into dependency levels
pub fn levels(graph: &DependencyGraph) -> Result<Vec<Vec<Arc<str>>>> {
    let all = graph.all_names();

    // Unsatisfied dependency count per name, by position in `all`
    let mut pending: Vec<usize> = vec![0; all.len()];
    // Reverse edges: dependency position -> dependent positions
    let mut dependents: FxHashMap<usize, Vec<usize>> = FxHashMap::default();

    for (name, deps) in graph.iter() {
        let Some(idx) = all.get_index_of(&**name) else {
            continue;
        };
        pending[idx] = deps.len();
        for dep in deps {
            if let Some(dep_idx) = all.get_index_of(&**dep) {
                dependents.entry(dep_idx).or_default().push(idx);
            }
        }
    }

    let mut current: Vec<usize> = (0..all.len()).filter(|&i| pending[i] == 0).collect();
    let mut result: Vec<Vec<Arc<str>>> = Vec::new();
    let mut emitted = 0;

    while !current.is_empty() {
        emitted += current.len();
        let mut next: Vec<usize> = Vec::new();
        for &i in &current {
            if let Some(waiting) = dependents.get(&i) {
                for &j in waiting {
                    pending[j] -= 1;
                    if pending[j] == 0 {
                        next.push(j);
                    }
                }
            }
        }
        next.sort_unstable();
        result.push(
            current
                .iter()
                .filter_map(|&i| all.get_index(i).cloned())
                .collect(),
        );
        current = next;
    }

    if emitted < all.len() {
        let cycle = graph.find_cycle().unwrap_or_else(|| {
            // Kahn stalled, so a cycle exists; fall back to naming the stuck set
            let stuck: Vec<&str> = (0..all.len())
                .filter(|&i| pending[i] > 0)
                .filter_map(|i| all.get_index(i).map(|s| &**s))
                .collect();
            stuck.join(", ")
        });
        return Err(OutplanError::CycleDetected { cycle });
    }

    debug!(names = emitted, levels = result.len(), "sorted dependency graph");
    Ok(result)
}

/// One linear order of every name: each name after all of its dependencies
pub fn order(graph: &DependencyGraph) -> Result<Vec<Arc<str>>> {
    Ok(levels(graph)?.into_iter().flatten().collect())
}
