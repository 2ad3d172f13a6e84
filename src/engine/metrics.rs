//! Compile pass metrics.
//!
//! Counters are collected on every pass (they are cheap) and surfaced through
//! [`Compiler::compile_verbose`](crate::Compiler::compile_verbose) and the CLI
//! report.

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileMetrics {
    /// Total elapsed time for the pass.
    pub total: Duration,
    /// Tokens left after unification.
    pub tokens: usize,
    /// Tokens that produced nothing (unknown key or no declarations).
    pub skipped: usize,
    /// Rules merged into the working set.
    pub cached: usize,
    /// Rules dropped because their fingerprint was already seen.
    pub deduplicated: usize,
    /// Breakpoints that produced non-empty CSS.
    pub rendered: usize,
}
