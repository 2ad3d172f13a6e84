//! Token grammar.
//!
//! ```text
//! token      := [breakpoint ":"] (qualifier ":")* key ["=" value] ["!"]
//! breakpoint := a derived breakpoint name ("md-up", "sm-down", ...)
//! value      := plain | "(" payload ")"
//! ```
//!
//! Parsing never fails loudly: anything that does not resolve to a registered
//! utility key yields `None` and is skipped by the caller.

use crate::breakpoints::BreakpointTable;
use crate::registry::UtilityRegistry;
use crate::{Token, TokenFlags};
use indexmap::IndexMap;

pub(crate) const IMPORTANT_MARKER: char = '!';
pub(crate) const VALUE_SEPARATOR: char = '=';
pub(crate) const KEY_SEPARATOR: char = ':';

/// Chain entry standing for the shadow host when a scoped token has no
/// qualifiers of its own.
pub(crate) const HOST_SELECTOR: &str = ":host";

/// Split `text` at the last value separator that is not inside a
/// parenthesized payload. An empty value counts as no value.
///
/// ```text
/// "md-up:p=2"        -> ("md-up:p", Some("2"))
/// "content=(a=b)"    -> ("content", Some("(a=b)"))
/// "row"              -> ("row", None)
/// ```
pub(crate) fn split_value(text: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut split = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            VALUE_SEPARATOR if depth == 0 => split = Some(idx),
            _ => {}
        }
    }
    match split {
        Some(idx) => {
            let value = &text[idx + VALUE_SEPARATOR.len_utf8()..];
            (&text[..idx], if value.is_empty() { None } else { Some(value) })
        }
        None => (text, None),
    }
}

/// Split a whitespace-delimited class list.
pub(crate) fn split_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// The part of a token that competes with other tokens: everything before
/// the value separator, without the important marker.
fn unify_key(token: &str) -> &str {
    let body = token.strip_suffix(IMPORTANT_MARKER).unwrap_or(token);
    split_value(body).0
}

/// Collapse competing tokens: at most one token survives per key, the last
/// one written wins, and it takes the position of the first occurrence.
///
/// ```
/// use utilcss::unify_utility_classes;
///
/// let out = unify_utility_classes(&["size:color=red", "weight=700", "size:color=blue"]);
/// assert_eq!(out, vec!["size:color=blue", "weight=700"]);
/// ```
pub fn unify_utility_classes<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut slots: IndexMap<&str, &str> = IndexMap::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        slots.insert(unify_key(token), token);
    }
    slots.into_values().map(str::to_string).collect()
}

/// Turns raw token text into [`Token`]s against a breakpoint table and registry.
pub(crate) struct Tokenizer<'a> {
    breakpoints: &'a BreakpointTable,
    registry: &'a UtilityRegistry,
}

impl<'a> Tokenizer<'a> {
    pub fn new(breakpoints: &'a BreakpointTable, registry: &'a UtilityRegistry) -> Self {
        Tokenizer { breakpoints, registry }
    }

    /// Parse one token. `None` when the key is not a registered utility.
    ///
    /// ```text
    /// "md-up:hover:color=red!"
    ///   1. strip "!"              -> important
    ///   2. split last "="         -> "md-up:hover:color" | "red"
    ///   3. breakpoint prefix      -> md-up
    ///   4. split ":" (no empties) -> ["hover", "color"]
    ///   5. last is the key        -> key "color", chain ["hover"]
    /// ```
    pub fn tokenize(&self, raw: &str, scoped: bool) -> Option<Token> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut flags = TokenFlags::empty();
        let body = match raw.strip_suffix(IMPORTANT_MARKER) {
            Some(body) => {
                flags |= TokenFlags::IMPORTANT;
                body
            }
            None => raw,
        };

        let (head, value) = split_value(body);

        let (breakpoint, rest) = match self.breakpoints.match_prefix(head) {
            Some(bp) => {
                flags |= TokenFlags::EXPLICIT_BREAKPOINT;
                (bp, &head[bp.name().len()..])
            }
            None => (self.breakpoints.minimum(), head),
        };

        let segments: Vec<&str> = rest.split(KEY_SEPARATOR).filter(|s| !s.is_empty()).collect();
        let (key, chain) = segments.split_last()?;

        if !self.registry.contains(key) {
            tracing::trace!(token = raw, key = *key, "unknown utility key, skipped");
            return None;
        }

        let mut chain: Vec<String> = chain.iter().map(|s| s.to_string()).collect();
        if scoped {
            flags |= TokenFlags::SCOPED;
            if chain.is_empty() {
                chain.push(HOST_SELECTOR.to_string());
            }
        }

        if value.is_some_and(|v| regex!(r"^\(.*\)$").is_match(v)) {
            flags |= TokenFlags::PARAMETRIC;
        }

        Some(Token {
            raw: raw.to_string(),
            breakpoint: breakpoint.name().to_string(),
            chain,
            key: key.to_string(),
            value: value.map(str::to_string),
            flags,
        })
    }
}
