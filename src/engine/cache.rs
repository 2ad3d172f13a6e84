//! Two-tier rule cache.
//!
//! ```text
//! RuleCache
//! ├─ seen     HashSet<Fingerprint>     append-only, cleared only by reinit
//! └─ working  breakpoint -> selector -> Declarations
//!             emptied at the start of every pass
//! ```
//!
//! `insert` is the single place where the compiler raises an error: a
//! selector without declarations must never be cached, and reaching that
//! state means an upstream stage skipped its emptiness check.

use super::dedup::Fingerprint;
use crate::{Declarations, Error, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Per-pass rules grouped by breakpoint, then selector, in first-seen order.
pub(crate) type WorkingSet = IndexMap<String, IndexMap<String, Declarations>>;

#[derive(Debug, Default)]
pub(crate) struct RuleCache {
    seen: HashSet<Fingerprint>,
    working: WorkingSet,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new compile pass with an empty working set.
    pub fn begin_pass(&mut self) {
        self.working.clear();
    }

    /// Cache `declarations` for `(breakpoint, selector)`.
    ///
    /// Returns `Ok(false)` when the fingerprint was already seen (nothing
    /// changes), `Ok(true)` when the declarations were merged into the working
    /// set. Merging is additive; same-named properties are overwritten.
    pub fn insert(&mut self, breakpoint: &str, selector: &str, declarations: Declarations) -> Result<bool> {
        if declarations.is_empty() {
            return Err(Error::EmptyDeclarations { breakpoint: breakpoint.to_string(), selector: selector.to_string() });
        }

        let fingerprint = Fingerprint::of(breakpoint, selector, &declarations);
        if !self.seen.insert(fingerprint) {
            tracing::trace!(breakpoint, selector, "rule already emitted");
            return Ok(false);
        }

        self.working
            .entry(breakpoint.to_string())
            .or_default()
            .entry(selector.to_string())
            .or_default()
            .merge(declarations);
        Ok(true)
    }

    pub fn working(&self) -> &WorkingSet {
        &self.working
    }

    /// Number of fingerprints remembered so far.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Forget everything (re-initialization).
    pub fn clear(&mut self) {
        self.seen.clear();
        self.working.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(props: crate::PropertyMap) -> Declarations {
        Declarations::new(props, false)
    }

    #[test]
    fn empty_declarations_are_rejected() {
        let mut cache = RuleCache::new();
        let err = cache.insert("md-up", ".a", Declarations::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyDeclarations { .. }));
        assert_eq!(cache.seen_len(), 0);
    }

    #[test]
    fn seen_fingerprints_are_noops_across_passes() {
        let mut cache = RuleCache::new();
        assert!(cache.insert("md-up", ".a", decls(props! { "color" => "red" })).unwrap());

        cache.begin_pass();
        assert!(!cache.insert("md-up", ".a", decls(props! { "color" => "red" })).unwrap());
        assert!(cache.working().is_empty());
        assert_eq!(cache.seen_len(), 1);
    }

    #[test]
    fn same_selector_merges_additively() {
        let mut cache = RuleCache::new();
        cache.insert("md-up", ".a", decls(props! { "color" => "red", "margin" => "0" })).unwrap();
        cache.insert("md-up", ".a", decls(props! { "color" => "blue", "padding" => "1px" })).unwrap();

        assert_eq!(
            cache.working()["md-up"][".a"].properties,
            props! { "color" => "blue", "margin" => "0", "padding" => "1px" }
        );
    }

    #[test]
    fn importance_follows_the_last_writer_of_each_property() {
        let mut cache = RuleCache::new();
        cache.insert(":host", ":host", decls(props! { "color" => "red", "margin" => "0" })).unwrap();
        cache.insert(":host", ":host", Declarations::new(props! { "padding" => "2px", "margin" => "1px" }, true)).unwrap();
        cache.insert(":host", ":host", decls(props! { "padding" => "3px" })).unwrap();

        let merged = &cache.working()[":host"][":host"];
        assert!(!merged.is_important("color"));
        assert!(merged.is_important("margin"));
        assert!(!merged.is_important("padding"));
    }

    #[test]
    fn clear_forgets_fingerprints() {
        let mut cache = RuleCache::new();
        cache.insert("md-up", ".a", decls(props! { "color" => "red" })).unwrap();
        cache.clear();
        assert!(cache.insert("md-up", ".a", decls(props! { "color" => "red" })).unwrap());
    }
}
