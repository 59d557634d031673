//! Outline tree model
//!
//! A node is a name plus its ordered children. The outline owns every node
//! for the lifetime of one run.

use serde::{Deserialize, Serialize};

/// One item of the outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including self
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// Pre-order walk: parent before children
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order iterator over a subtree
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed outline. `root == None` is the empty tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub root: Option<Node>,
}

impl Outline {
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, Node::len)
    }

    /// Indented rendering, two spaces per level
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        if let Some(root) = &self.root {
            write_pretty(root, 0, &mut out);
        }
        out
    }
}

fn write_pretty(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node.name);
    out.push('\n');
    for child in &node.children {
        write_pretty(child, depth + 1, out);
    }
}
