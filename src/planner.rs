//! Planner - runs extract → close → sort for one outline
//!
//! Each call owns its graphs from start to finish; nothing is shared
//! between runs.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info_span};

use crate::error::{Diagnostic, Result};
use crate::graph::{self, DependencyGraph};
use crate::tree::Outline;

/// Result of planning one outline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    /// Direct child → parent edges, before closure
    pub direct: DependencyGraph,
    /// Transitively closed dependencies
    pub graph: DependencyGraph,
    /// Names grouped by dependency level
    pub levels: Vec<Vec<Arc<str>>>,
    /// Every name after all of its dependencies
    pub order: Vec<Arc<str>>,
    /// Non-fatal findings (unknown references)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a name in the order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| &**n == name)
    }
}

/// Runs the planning pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    strict: bool,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat unknown-name diagnostics as fatal
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Plan an outline from scratch
    pub fn plan(&self, outline: &Outline) -> Result<Plan> {
        let _span = info_span!("plan", nodes = outline.len()).entered();
        self.plan_graph(graph::extract(outline))
    }

    /// Plan a graph of direct dependencies built elsewhere
    pub fn plan_graph(&self, direct: DependencyGraph) -> Result<Plan> {
        let mut closed = direct.clone();
        let diagnostics = graph::close(&mut closed)?;

        if self.strict {
            if let Some(first) = diagnostics.first() {
                return Err(first.clone().into_error());
            }
        }
        self.finish(direct, closed, diagnostics)
    }

    fn finish(
        &self,
        direct: DependencyGraph,
        graph: DependencyGraph,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<Plan> {
        let levels = graph::levels(&graph)?;
        let order: Vec<Arc<str>> = levels.iter().flatten().cloned().collect();
        debug!(
            names = order.len(),
            levels = levels.len(),
            diagnostics = diagnostics.len(),
            "plan ready"
        );
        Ok(Plan {
            direct,
            graph,
            levels,
            order,
            diagnostics,
        })
    }
}
