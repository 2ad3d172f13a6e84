//! One compile request, end to end.
//!
//! A `CompilePass` borrows the long-lived compiler state and runs a single
//! batch of tokens through the pipeline against one cache partition:
//!
//! ```text
//! run(tokens, cache, scoped)
//!   │
//!   ├─ unify_utility_classes      collapse competing tokens
//!   ├─ cache.begin_pass           empty working set
//!   ├─ per token
//!   │    tokenize ─> definition ─> resolve ─> (empty? skip)
//!   │                            └> selector
//!   │    cache.insert             fingerprint gate + merge
//!   └─ render                     minimum + touched breakpoints, table order
//! ```
//!
//! Breakpoints are always rendered in table order (minimum, "-up" ascending,
//! "-down" descending), independent of the order the tokens were written in,
//! so later media blocks win the cascade.

use super::cache::RuleCache;
use super::metrics::CompileMetrics;
use super::resolve::resolve_declarations;
use super::selector::SelectorBuilder;
use super::serialize::{PropertyExtensions, StyleSerializer};
use super::tokenizer::{Tokenizer, unify_utility_classes};
use crate::breakpoints::BreakpointTable;
use crate::registry::UtilityRegistry;
use crate::{Emitted, Result};
use std::collections::HashSet;
use std::time::Instant;

/// Output of [`CompilePass::run`].
#[derive(Debug, Default)]
pub(crate) struct PassResult {
    /// Non-empty CSS per breakpoint, in cascade order.
    pub emitted: Vec<Emitted>,
    pub metrics: CompileMetrics,
}

pub(crate) struct CompilePass<'a> {
    breakpoints: &'a BreakpointTable,
    registry: &'a UtilityRegistry,
    extensions: &'a PropertyExtensions,
}

impl<'a> CompilePass<'a> {
    pub fn new(
        breakpoints: &'a BreakpointTable,
        registry: &'a UtilityRegistry,
        extensions: &'a PropertyExtensions,
    ) -> Self {
        CompilePass { breakpoints, registry, extensions }
    }

    /// Compile `tokens` into `cache`'s partition and render what is new.
    ///
    /// Only `RuleCache::insert` can fail; every other problem (unknown keys,
    /// empty resolutions, already-emitted rules) is skipped silently.
    pub fn run<S: AsRef<str>>(&self, tokens: &[S], cache: &mut RuleCache, scoped: bool) -> Result<PassResult> {
        let start = Instant::now();
        let tokens = unify_utility_classes(tokens);
        let mut metrics = CompileMetrics { tokens: tokens.len(), ..CompileMetrics::default() };

        let tokenizer = Tokenizer::new(self.breakpoints, self.registry);
        let selectors = SelectorBuilder::new(self.registry);
        let mut touched: HashSet<String> = HashSet::new();

        cache.begin_pass();
        for raw in &tokens {
            let Some(token) = tokenizer.tokenize(raw, scoped) else {
                metrics.skipped += 1;
                continue;
            };
            let Some(def) = self.registry.get(&token.key) else {
                metrics.skipped += 1;
                continue;
            };

            let declarations = resolve_declarations(&token, def, self.registry);
            if declarations.is_empty() {
                tracing::trace!(token = %raw, "no declarations resolved, skipped");
                metrics.skipped += 1;
                continue;
            }

            let selector = selectors.build(&token, def);
            if cache.insert(&token.breakpoint, &selector, declarations)? {
                metrics.cached += 1;
                touched.insert(token.breakpoint);
            } else {
                metrics.deduplicated += 1;
            }
        }

        let serializer = StyleSerializer::new(self.extensions);
        let mut emitted = Vec::new();
        for breakpoint in self.breakpoints.iter() {
            if !breakpoint.is_minimum() && !touched.contains(breakpoint.name()) {
                continue;
            }
            let css = serializer.render(cache.working(), breakpoint);
            if css.is_empty() {
                continue;
            }
            tracing::debug!(breakpoint = breakpoint.name(), bytes = css.len(), "rendered");
            emitted.push(Emitted { breakpoint: breakpoint.name().to_string(), css });
        }

        metrics.rendered = emitted.len();
        metrics.total = start.elapsed();
        tracing::debug!(
            tokens = metrics.tokens,
            skipped = metrics.skipped,
            cached = metrics.cached,
            deduplicated = metrics.deduplicated,
            rendered = metrics.rendered,
            fingerprints = cache.seen_len(),
            scoped,
            "compile pass finished"
        );

        Ok(PassResult { emitted, metrics })
    }
}
