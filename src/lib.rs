//! Outplan - dependency planning for indented outlines
//!
//! An outline nests items under their prerequisites:
//!
//! ```text
//! a
//!     b
//!     c
//!         d
//! ```
//!
//! Each item depends on its parent (`d` on `c`, `c` on `a`). Outplan builds
//! that dependency graph, expands it to the transitive closure and orders
//! every item after everything it depends on.
//!
//! ```
//! use outplan::{parse, Planner};
//!
//! let outline = parse("a\n  b\n  c\n    d\n").unwrap();
//! let plan = Planner::new().plan(&outline).unwrap();
//! let order: Vec<&str> = plan.order.iter().map(|s| &**s).collect();
//! assert_eq!(order, vec!["a", "b", "c", "d"]);
//! assert!(plan.graph.depends_on("d", "a"));
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod parser;
pub mod planner;
pub mod tree;

pub use config::OutplanConfig;
pub use error::{Diagnostic, FixSuggestion, OutplanError, Result};
pub use graph::{DependencyExtractor, DependencyGraph, NameSet};
pub use output::OutputFormat;
pub use parser::{parse, OutlineParser};
pub use planner::{Plan, Planner};
pub use tree::{Node, Outline};
