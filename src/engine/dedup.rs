//! Rule fingerprints.
//!
//! Every rule that reaches the cache is identified by a content hash of
//! `(breakpoint, selector, serialized declarations)`. The compiler keeps the
//! set of fingerprints it has already emitted for its whole lifetime, which is
//! what makes compiling the same tokens twice produce no CSS the second time.
//!
//! ## What counts as "the same rule"
//!
//! - Breakpoint name (`md-up` and `md-down` are different rules).
//! - Final selector text, after chaining and escaping.
//! - Declarations in order, including which of them are important.
//!
//! Two tokens that resolve to identical triples share a fingerprint even if
//! they were written differently, and are emitted once.
//!
//! ## Tradeoffs
//!
//! - The key is a 64-bit hash rather than the full text, so the set stays
//!   small for long-running processes. `DefaultHasher::new()` is keyed
//!   identically on every call, so fingerprints are stable within a process.

use crate::Declarations;
use std::hash::{DefaultHasher, Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Fingerprint(u64);

impl Fingerprint {
    pub(crate) fn of(breakpoint: &str, selector: &str, declarations: &Declarations) -> Self {
        let mut hasher = DefaultHasher::new();
        breakpoint.hash(&mut hasher);
        selector.hash(&mut hasher);
        declarations.serialize().hash(&mut hasher);
        Fingerprint(hasher.finish())
    }
}
