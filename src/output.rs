//! Output format and rendering of trees, graphs and plans

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::tree::Outline;

/// Output format enum
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one item per line (default)
    #[default]
    Text,

    /// JSON document
    Json,

    /// YAML document
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

fn structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)? + "\n")),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}

/// One name per line
pub fn render_order(order: &[Arc<str>], format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(order, format)? {
        return Ok(out);
    }
    let mut out = String::new();
    for name in order {
        out.push_str(name);
        out.push('\n');
    }
    Ok(out)
}

/// `level N: a, b` per level
pub fn render_levels(levels: &[Vec<Arc<str>>], format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(levels, format)? {
        return Ok(out);
    }
    let mut out = String::new();
    for (i, level) in levels.iter().enumerate() {
        let names: Vec<&str> = level.iter().map(|s| &**s).collect();
        let _ = writeln!(out, "level {}: {}", i, names.join(", "));
    }
    Ok(out)
}

/// `name: dep1, dep2` per key, in key order
pub fn render_graph(graph: &DependencyGraph, format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(graph, format)? {
        return Ok(out);
    }
    let mut out = String::new();
    for (name, deps) in graph.iter() {
        let deps: Vec<&str> = deps.iter().map(|s| &**s).collect();
        if deps.is_empty() {
            let _ = writeln!(out, "{}:", name);
        } else {
            let _ = writeln!(out, "{}: {}", name, deps.join(", "));
        }
    }
    Ok(out)
}

/// Indented tree, two spaces per level
pub fn render_tree(outline: &Outline, format: OutputFormat) -> Result<String> {
    if let Some(out) = structured(&outline.root, format)? {
        return Ok(out);
    }
    Ok(outline.pretty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;

    fn arcs(names: &[&str]) -> Vec<Arc<str>> {
        names.iter().map(|s| Arc::from(*s)).collect()
    }

    #[test]
    fn default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" YML ".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let wrapper: Wrapper = toml::from_str("format = \"yaml\"").unwrap();
        assert_eq!(wrapper.format, OutputFormat::Yaml);
    }

    #[test]
    fn order_as_text_and_json() {
        let order = arcs(&["a", "b"]);
        assert_eq!(render_order(&order, OutputFormat::Text).unwrap(), "a\nb\n");
        let json = render_order(&order, OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }

    #[test]
    fn levels_as_text() {
        let levels = vec![arcs(&["a"]), arcs(&["b", "c"])];
        assert_eq!(
            render_levels(&levels, OutputFormat::Text).unwrap(),
            "level 0: a\nlevel 1: b, c\n"
        );
    }

    #[test]
    fn graph_as_text() {
        let graph: DependencyGraph = [("a", &[][..]), ("b", &["a"][..])].into_iter().collect();
        assert_eq!(
            render_graph(&graph, OutputFormat::Text).unwrap(),
            "a:\nb: a\n"
        );
    }

    #[test]
    fn tree_as_yaml() {
        let outline = Outline::new(Node::with_children("a", vec![Node::new("b")]));
        let yaml = render_tree(&outline, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("name: a"));
        assert!(yaml.contains("name: b"));
    }
}
