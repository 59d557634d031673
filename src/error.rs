//! Error types with fix suggestions
//!
//! Error codes:
//! - OUTPLAN-001-009: outline parse errors
//! - OUTPLAN-020-029: dependency graph errors
//! - OUTPLAN-030-039: configuration errors
//! - OUTPLAN-040-049: I/O and rendering errors

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutplanError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum OutplanError {
    // ─────────────────────────────────────────────────────────────
    // Outline parse errors (OUTPLAN-001 to OUTPLAN-003)
    // ─────────────────────────────────────────────────────────────
    #[error("[OUTPLAN-001] Line {line}: '{content}' is not a valid name")]
    InvalidName { line: usize, content: String },

    #[error("[OUTPLAN-002] Line {line}: unexpected indentation at column {column}")]
    UnexpectedIndent { line: usize, column: usize },

    #[error("[OUTPLAN-003] Line {line}: second root '{name}' (an outline has exactly one root)")]
    MultipleRoots { line: usize, name: String },

    // ─────────────────────────────────────────────────────────────
    // Graph errors (OUTPLAN-020 to OUTPLAN-021)
    // ─────────────────────────────────────────────────────────────
    #[error("[OUTPLAN-020] Cycle detected in dependency graph: {cycle}")]
    CycleDetected { cycle: String },

    #[error("[OUTPLAN-021] '{referenced_by}' depends on unknown name '{name}'")]
    UnknownNameReference { name: String, referenced_by: String },

    // ─────────────────────────────────────────────────────────────
    // Config errors (OUTPLAN-030)
    // ─────────────────────────────────────────────────────────────
    #[error("[OUTPLAN-030] Config error: {reason}")]
    ConfigError { reason: String },

    // ─────────────────────────────────────────────────────────────
    // I/O and rendering (OUTPLAN-040 to OUTPLAN-041)
    // ─────────────────────────────────────────────────────────────
    #[error("[OUTPLAN-040] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[OUTPLAN-041] Failed to serialize output: {reason}")]
    Serialize { reason: String },
}

impl OutplanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "OUTPLAN-001",
            Self::UnexpectedIndent { .. } => "OUTPLAN-002",
            Self::MultipleRoots { .. } => "OUTPLAN-003",
            Self::CycleDetected { .. } => "OUTPLAN-020",
            Self::UnknownNameReference { .. } => "OUTPLAN-021",
            Self::ConfigError { .. } => "OUTPLAN-030",
            Self::Io(_) => "OUTPLAN-040",
            Self::Serialize { .. } => "OUTPLAN-041",
        }
    }

    /// Line of the outline the error points at, for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidName { line, .. }
            | Self::UnexpectedIndent { line, .. }
            | Self::MultipleRoots { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl FixSuggestion for OutplanError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            OutplanError::InvalidName { .. } => {
                Some("Use one identifier per line: letters, digits and '_', not starting with a digit")
            }
            OutplanError::UnexpectedIndent { .. } => {
                Some("Dedent only to a column used by an enclosing item, and start the root at column 0")
            }
            OutplanError::MultipleRoots { .. } => {
                Some("Nest every item under a single top-level root")
            }
            OutplanError::CycleDetected { .. } => {
                Some("An item cannot appear inside its own subtree; rename one of the repeated items")
            }
            OutplanError::UnknownNameReference { .. } => {
                Some("Add the referenced item to the outline, or run without --strict")
            }
            OutplanError::ConfigError { .. } => {
                Some("Check ~/.config/outplan/config.toml and OUTPLAN_* variables")
            }
            OutplanError::Io(_) => Some("Check file path and permissions"),
            OutplanError::Serialize { .. } => None,
        }
    }
}

impl From<serde_json::Error> for OutplanError {
    fn from(e: serde_json::Error) -> Self {
        OutplanError::Serialize {
            reason: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for OutplanError {
    fn from(e: serde_yaml::Error) -> Self {
        OutplanError::Serialize {
            reason: e.to_string(),
        }
    }
}

/// Non-fatal finding reported alongside a successful plan
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("[OUTPLAN-021] '{referenced_by}' depends on unknown name '{name}'")]
    UnknownNameReference { name: String, referenced_by: String },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownNameReference { .. } => "OUTPLAN-021",
        }
    }

    /// Escalate to a fatal error (strict mode)
    pub fn into_error(self) -> OutplanError {
        match self {
            Self::UnknownNameReference {
                name,
                referenced_by,
            } => OutplanError::UnknownNameReference {
                name,
                referenced_by,
            },
        }
    }
}
