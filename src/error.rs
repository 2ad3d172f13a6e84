//! Error types.
//!
//! Almost nothing in the compiler is an error: unknown tokens, unknown
//! breakpoints and re-emitted rules are silent no-ops. What remains is
//! configuration loading, and the single internal invariant of the rule cache
//! (never cache a selector without declarations).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The configuration JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The merged configuration defines no breakpoints.
    #[error("configuration defines no breakpoints")]
    NoBreakpoints,

    /// A breakpoint threshold is not a finite number.
    #[error("breakpoint `{name}` has a non-finite threshold")]
    InvalidBreakpoint { name: String },

    /// A prefix list refers to a scale missing from `variables`.
    #[error("prefix `{prefix}` refers to unknown scale `{scale}`")]
    UnknownScale { prefix: String, scale: String },

    /// An override pattern could not be parsed into `breakpoint:key=value` axes.
    #[error("invalid override pattern `{0}`")]
    InvalidOverride(String),

    /// A selector reached the rule cache with no declarations.
    #[error("cannot cache `{selector}` at `{breakpoint}` without declarations")]
    EmptyDeclarations { breakpoint: String, selector: String },
}
