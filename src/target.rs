//! Style-sheet targets.
//!
//! The compiler only produces CSS text per breakpoint; where that text ends up
//! is the target's business. A target exposes one insertion point per
//! breakpoint and receives text through [`StyleTarget::append`].
//!
//! [`StyleSheet`] is the in-memory target used by default, by the CLI and in
//! tests. It keeps one buffer per breakpoint and always concatenates them in
//! cascade order, no matter which breakpoint was appended to first:
//!
//! ```text
//! append(md-up, A)     sections: [md-up: A]
//! append(sm-up, B)     sections: [sm-up: B][md-up: A]
//! append(md-up, C)     sections: [sm-up: B][md-up: AC]
//! to_css()             "B" + "AC"
//! ```

use crate::breakpoints::Breakpoint;
use std::collections::BTreeMap;

/// Receives rendered CSS, one breakpoint at a time.
pub trait StyleTarget {
    fn append(&mut self, breakpoint: &Breakpoint, css: &str);

    /// Drop everything appended so far.
    fn clear(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    css: String,
}

/// In-memory style sheet with one buffer per breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    /// Keyed by breakpoint rank so iteration follows cascade order.
    sections: BTreeMap<usize, Section>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// CSS accumulated for breakpoint `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections.values().find(|s| s.name == name).map(|s| s.css.as_str())
    }

    /// `(breakpoint name, css)` pairs in cascade order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.values().map(|s| (s.name.as_str(), s.css.as_str()))
    }

    /// The whole sheet, buffers concatenated in cascade order.
    pub fn to_css(&self) -> String {
        self.sections.values().map(|s| s.css.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(|s| s.css.is_empty())
    }
}

impl StyleTarget for StyleSheet {
    fn append(&mut self, breakpoint: &Breakpoint, css: &str) {
        self.sections
            .entry(breakpoint.rank())
            .or_insert_with(|| Section { name: breakpoint.name().to_string(), css: String::new() })
            .css
            .push_str(css);
    }

    fn clear(&mut self) {
        self.sections.clear();
    }
}

impl<T: StyleTarget + ?Sized> StyleTarget for &mut T {
    fn append(&mut self, breakpoint: &Breakpoint, css: &str) {
        (**self).append(breakpoint, css);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
