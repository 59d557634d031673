//! Indentation-aware outline parser
//!
//! Turns text like
//!
//! ```text
//! a
//!     b
//!     c
//!         d
//! ```
//!
//! into an [`Outline`]. One identifier per line; leading whitespace sets the
//! depth. A tab counts as `tab_width` columns. Blank lines are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{OutplanError, Result};
use crate::tree::{Node, Outline};

/// Default columns per tab
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Widest tab a config may ask for
pub const MAX_TAB_WIDTH: usize = 64;

/// Identifier alphabet for outline names
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check a single name against the identifier alphabet
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Parser settings
#[derive(Debug, Clone, Copy)]
pub struct OutlineParser {
    tab_width: usize,
}

impl Default for OutlineParser {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl OutlineParser {
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Parse outline text into a tree
    pub fn parse(&self, text: &str) -> Result<Outline> {
        // Open items from the root down to the current line, with their columns
        let mut path: Vec<(usize, Node)> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let (column, content) = self.split_indent(raw, line)?;
            let content = content.trim_end();
            if content.is_empty() {
                continue;
            }
            if !is_valid_name(content) {
                return Err(OutplanError::InvalidName {
                    line,
                    content: content.to_string(),
                });
            }

            let Some(&(top, _)) = path.last() else {
                if column != 0 {
                    return Err(OutplanError::UnexpectedIndent { line, column });
                }
                path.push((column, Node::new(content)));
                continue;
            };

            if column > top {
                path.push((column, Node::new(content)));
                continue;
            }

            // Close deeper items until we are back at this column
            while path.last().is_some_and(|(c, _)| *c > column) {
                close_last(&mut path);
            }
            match path.last() {
                Some((c, _)) if *c == column => {}
                _ => return Err(OutplanError::UnexpectedIndent { line, column }),
            }
            if path.len() == 1 {
                return Err(OutplanError::MultipleRoots {
                    line,
                    name: content.to_string(),
                });
            }
            // Sibling of the previous item at this depth
            close_last(&mut path);
            path.push((column, Node::new(content)));
        }

        while path.len() > 1 {
            close_last(&mut path);
        }
        let outline = Outline {
            root: path.pop().map(|(_, node)| node),
        };
        debug!(nodes = outline.len(), "parsed outline");
        Ok(outline)
    }

    /// Column of the first non-indent character, and the rest of the line
    fn split_indent<'a>(&self, raw: &'a str, line: usize) -> Result<(usize, &'a str)> {
        let mut column: usize = 0;
        for (pos, ch) in raw.char_indices() {
            let width = match ch {
                ' ' => 1,
                '\t' => self.tab_width,
                _ => return Ok((column, &raw[pos..])),
            };
            column = column
                .checked_add(width)
                .ok_or(OutplanError::UnexpectedIndent { line, column })?;
        }
        Ok((column, ""))
    }
}

/// Pop the innermost open item and attach it to its parent
fn close_last(path: &mut Vec<(usize, Node)>) {
    if path.len() < 2 {
        return;
    }
    if let Some((_, node)) = path.pop() {
        if let Some((_, parent)) = path.last_mut() {
            parent.push(node);
        }
    }
}

/// Parse with the default tab width
pub fn parse(text: &str) -> Result<Outline> {
    OutlineParser::default().parse(text)
}
