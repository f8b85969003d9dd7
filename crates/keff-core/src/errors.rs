//! Structured error types shared across the harness crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload carried by every [`KeffError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, line numbers, tokens, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint for the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the sweep harness.
///
/// The variant selects the failure family defined by the error taxonomy:
/// configuration errors are fatal before any run starts, patch / invoke /
/// extract errors are local to one sweep point, and reporting errors are
/// terminal but non-destructive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum KeffError {
    /// Invalid sweep bounds, unreadable plan, or missing prerequisite files.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Deck I/O, encoding, or backup/restore failures.
    #[error("deck error: {0}")]
    Deck(ErrorInfo),
    /// Field patching failures (bad line index, malformed line).
    #[error("patch error: {0}")]
    Patch(ErrorInfo),
    /// Simulator launch, exit-status, or timeout failures.
    #[error("invoke error: {0}")]
    Invoke(ErrorInfo),
    /// Report scraping failures (missing header, unparsable value).
    #[error("extract error: {0}")]
    Extract(ErrorInfo),
    /// Result aggregation failures (nothing to summarize).
    #[error("report error: {0}")]
    Report(ErrorInfo),
}

impl KeffError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            KeffError::Config(info)
            | KeffError::Deck(info)
            | KeffError::Patch(info)
            | KeffError::Invoke(info)
            | KeffError::Extract(info)
            | KeffError::Report(info) => info,
        }
    }

    /// Returns true when the failure is local to a single sweep point and
    /// the controller may skip the point and continue.
    pub fn is_point_local(&self) -> bool {
        matches!(
            self,
            KeffError::Patch(_) | KeffError::Invoke(_) | KeffError::Extract(_)
        )
    }
}
