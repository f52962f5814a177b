//! Error types for the assessment core.
//!
//! The scoring engine and the quiz session share a small taxonomy; storage
//! failures are deliberately NOT part of it (the insights store reports them
//! via tracing and carries on, see `insights.rs`).

use thiserror::Error;

/// Errors produced by the scoring engine and session setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Empty question set or a malformed answer domain. Fatal to the
    /// scoring call: no partial result is produced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A subject was selected whose question bank has no questions.
    /// Configuration error, surfaced before a session starts.
    #[error("empty question bank for subject '{0}'")]
    EmptyBank(String),
}
