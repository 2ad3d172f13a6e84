//! Selector construction.
//!
//! A token's selector is assembled from three parts:
//!
//! ```text
//! [parent context] <subject>[fragments]
//!
//! dark:hover:color=red
//!   subject    [class*="dark:hover:color=red"]
//!   "dark"  -> ".dark>>"   parent context, hoisted and followed by a space
//!   "hover" -> "&:hover"   adjacent fragment (no whitespace)
//!   => .dark [class*="dark:hover:color=red"]:hover
//! ```
//!
//! The subject is the definition's literal selector when it has one (each
//! comma-separated entry is transformed independently), otherwise an
//! attribute-substring match on the base identifier, or an escaped class
//! selector for parametric values whose payload would not survive inside an
//! attribute string.
//!
//! Scoped (shadow) tokens never use attribute matching: the subject is the
//! literal selector or `:host`, parent contexts become `:host-context(..)` and
//! adjacent fragments on the host become `:host(..)`.

use super::tokenizer::HOST_SELECTOR;
use crate::registry::{UtilityDefinition, UtilityRegistry};
use crate::Token;
use std::fmt::Write;

/// Splits a fragment into a hoisted parent context and the local part.
const PARENT_MARKER: &str = ">>";
/// Leading marker on a fragment: attach without whitespace.
const NO_SPACE_MARKER: char = '&';

/// Escape `text` as a CSS class identifier.
///
/// ASCII alphanumerics, `-`, `_` and non-ASCII pass through; every other
/// character is backslash-escaped. A leading digit becomes a hex escape.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (idx, ch) in text.chars().enumerate() {
        if idx == 0 && ch.is_ascii_digit() {
            let _ = write!(out, "\\{:x} ", ch as u32);
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A resolved selector-key segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    parent: Option<String>,
    text: String,
    adjacent: bool,
}

impl Fragment {
    fn parse(source: &str) -> Fragment {
        let (parent, local) = match source.split_once(PARENT_MARKER) {
            Some((parent, local)) => {
                let parent = parent.trim();
                (if parent.is_empty() { None } else { Some(parent.to_string()) }, local)
            }
            None => (None, source),
        };
        let (adjacent, text) = match local.trim_start().strip_prefix(NO_SPACE_MARKER) {
            Some(text) => (true, text),
            None => (false, local.trim_start()),
        };
        Fragment { parent, text: text.trim_end().to_string(), adjacent }
    }

    fn attach(&self, selector: &mut String) {
        if self.text.is_empty() {
            return;
        }
        if !self.adjacent {
            selector.push(' ');
        }
        selector.push_str(&self.text);
    }
}

pub(crate) struct SelectorBuilder<'a> {
    registry: &'a UtilityRegistry,
}

impl<'a> SelectorBuilder<'a> {
    pub fn new(registry: &'a UtilityRegistry) -> Self {
        SelectorBuilder { registry }
    }

    /// Full selector text for `token`.
    pub fn build(&self, token: &Token, def: &UtilityDefinition) -> String {
        if token.is_scoped() {
            return self.build_scoped(token, def);
        }

        let fragments = self.fragments(&token.chain);
        let parents: Vec<&str> = fragments.iter().filter_map(|f| f.parent.as_deref()).collect();

        self.subjects(token, def)
            .into_iter()
            .map(|subject| {
                let mut selector = String::new();
                if !parents.is_empty() {
                    selector.push_str(&parents.join(" "));
                    selector.push(' ');
                }
                selector.push_str(&subject);
                for fragment in &fragments {
                    fragment.attach(&mut selector);
                }
                selector
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// ```text
    /// padding=2            ->  :host
    /// hover:padding=2      ->  :host(:hover)
    /// dark:padding=2       ->  :host-context(.dark)
    /// children:padding=2   ->  :host > *
    /// (selector "slot")    ->  slot
    /// ```
    fn build_scoped(&self, token: &Token, def: &UtilityDefinition) -> String {
        let chain: Vec<String> = token.chain.iter().filter(|s| *s != HOST_SELECTOR).cloned().collect();
        let fragments = self.fragments(&chain);
        let context = fragments.iter().filter_map(|f| f.parent.as_deref()).collect::<Vec<_>>().join(" ");

        let subjects: Vec<String> = match &def.selector {
            Some(list) => split_list(list),
            None => vec![HOST_SELECTOR.to_string()],
        };

        subjects
            .into_iter()
            .map(|subject| {
                let is_host = subject == HOST_SELECTOR;
                let mut host_state = String::new();
                let mut tail = String::new();
                for fragment in &fragments {
                    if is_host && fragment.adjacent && tail.is_empty() {
                        host_state.push_str(&fragment.text);
                    } else {
                        fragment.attach(&mut tail);
                    }
                }

                let head = match (is_host, context.is_empty()) {
                    (true, true) if host_state.is_empty() => HOST_SELECTOR.to_string(),
                    (true, true) => format!("{HOST_SELECTOR}({host_state})"),
                    (true, false) => format!("{HOST_SELECTOR}-context({context}){host_state}"),
                    (false, true) => subject,
                    (false, false) => format!("{HOST_SELECTOR}-context({context}) {subject}"),
                };
                head + &tail
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn subjects(&self, token: &Token, def: &UtilityDefinition) -> Vec<String> {
        if let Some(list) = &def.selector {
            return split_list(list);
        }
        if token.is_parametric() {
            vec![format!(".{}", escape(&token.raw))]
        } else {
            vec![format!("[class*=\"{}\"]", token.base_identifier().replace('"', "\\\""))]
        }
    }

    /// Unknown selector keys default to a pseudo-class of the same name.
    fn fragments(&self, chain: &[String]) -> Vec<Fragment> {
        chain
            .iter()
            .map(|key| match self.registry.selector_fragment(key) {
                Some(source) => Fragment::parse(source),
                None => Fragment { parent: None, text: format!(":{key}"), adjacent: true },
            })
            .collect()
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
