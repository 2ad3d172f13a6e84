//! Token-to-rule compilation engine.
//!
//! This module is the core of the crate: it turns utility tokens into CSS rule
//! text. The public facade (`api.rs`) owns the long-lived state (breakpoints,
//! registry, fingerprint sets, style targets) and hands it to a
//! [`CompilePass`] for every compile request.
//!
//! ## How the parts work together
//!
//! ```text
//! "md-up:p=2 hover:color=primary p=1 md-up:p=3"
//!        │
//!        │ unify_utility_classes        (tokenizer.rs)
//!        v   last write wins per key, first position kept
//! ["md-up:p=3", "hover:color=primary", "p=1"]
//!        │
//!        │ Tokenizer::tokenize          (tokenizer.rs)
//!        v   breakpoint / chain / key / value / flags; unknown keys dropped
//! Token ──┬── SelectorBuilder::build    (selector.rs)   -> selector text
//!         └── resolve_declarations      (resolve.rs)    -> Declarations
//!                       │
//!                       v
//!          RuleCache::insert            (cache.rs + dedup.rs)
//!            - Fingerprint seen?  -> no-op
//!            - else merge into the pass working set
//!                       │
//!                       v
//!          StyleSerializer::render      (serialize.rs)
//!            minimum breakpoint + every breakpoint touched, cascade order
//!                       │
//!                       v
//!                 Vec<Emitted>  ──> StyleTarget::append
//! ```
//!
//! ## Caching
//!
//! Two tiers with different lifetimes:
//!
//! - the fingerprint set lives as long as the compiler (or scope) and is only
//!   cleared by re-initialization;
//! - the working set lives for one pass only and groups rules per breakpoint
//!   and selector before serialization.
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: token grammar (`!`, `=`, breakpoint prefix, `:` chain) and
//!   batch unification.
//! - `selector.rs`: selector text, escaping, parent hoisting (`>>`), adjacency
//!   (`&`), scoped (`:host`) rendering.
//! - `resolve.rs`: layered property resolution (common, exact, parametric,
//!   broadened overrides, literal override).
//! - `dedup.rs`: content fingerprints.
//! - `cache.rs`: fingerprint set + per-pass working set.
//! - `serialize.rs`: CSS text per breakpoint, media-query wrapping.
//! - `metrics.rs`: per-pass counters and timing.
//! - `pass.rs`: one compile request end to end.
//!
//! ## Debugging
//!
//! All stages emit `tracing` events (`debug` per pass, `trace` per token). The
//! `utilcss` binary installs a subscriber when `UTILCSS_DEBUG` is set.

#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pass.rs"]
mod pass;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/selector.rs"]
mod selector;
#[path = "engine/serialize.rs"]
mod serialize;
#[path = "engine/tokenizer.rs"]
mod tokenizer;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub(crate) use cache::RuleCache;
pub use metrics::CompileMetrics;
pub(crate) use pass::{CompilePass, PassResult};
pub use serialize::PropertyExtension;
pub(crate) use serialize::PropertyExtensions;
pub(crate) use tokenizer::{split_tokens, split_value};
pub use tokenizer::unify_utility_classes;
