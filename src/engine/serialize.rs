//! CSS serialization.
//!
//! Renders one breakpoint's slice of the working set:
//!
//! ```text
//! minimum breakpoint:   sel{prop:value;...}sel{...}
//! other breakpoints:    @media (min-width: 768px) {sel{prop:value;...}...}
//!                              (max-width for "-down")
//! ```
//!
//! Selectors whose declarations are empty are skipped, and a breakpoint with
//! no remaining blocks renders as empty text (never a bare `@media {}`).

use super::cache::WorkingSet;
use crate::breakpoints::Breakpoint;
use crate::Declarations;
use std::collections::HashMap;
use std::fmt::Write;

const IMPORTANT_SUFFIX: &str = "!important";

/// Custom expansion for one CSS property: receives the property name and the
/// final value (including any `!important`) and returns declaration text,
/// e.g. `"margin-inline-start:4px;margin-inline-end:4px;"`.
pub type PropertyExtension = Box<dyn Fn(&str, &str) -> String>;

pub(crate) type PropertyExtensions = HashMap<String, PropertyExtension>;

pub(crate) struct StyleSerializer<'a> {
    extensions: &'a PropertyExtensions,
}

impl<'a> StyleSerializer<'a> {
    pub fn new(extensions: &'a PropertyExtensions) -> Self {
        StyleSerializer { extensions }
    }

    /// Render `breakpoint` from `working`; empty text when nothing applies.
    pub fn render(&self, working: &WorkingSet, breakpoint: &Breakpoint) -> String {
        let Some(rules) = working.get(breakpoint.name()) else {
            return String::new();
        };

        let mut body = String::new();
        let mut blocks = 0usize;
        for (selector, declarations) in rules {
            if declarations.is_empty() {
                continue;
            }
            body.push_str(selector);
            body.push('{');
            self.write_declarations(&mut body, declarations);
            body.push('}');
            blocks += 1;
        }

        if blocks == 0 {
            return String::new();
        }
        if breakpoint.is_minimum() {
            return body;
        }
        format!("@media {} {{{}}}", breakpoint.media_query(), body)
    }

    fn write_declarations(&self, out: &mut String, declarations: &Declarations) {
        for (prop, value) in &declarations.properties {
            let value = if declarations.is_important(prop) && !value.contains(IMPORTANT_SUFFIX) {
                format!("{value} {IMPORTANT_SUFFIX}")
            } else {
                value.clone()
            };
            match self.extensions.get(prop) {
                Some(extend) => out.push_str(&extend(prop, &value)),
                None => {
                    let _ = write!(out, "{prop}:{value};");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::BreakpointTable;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn table() -> BreakpointTable {
        let config: IndexMap<String, f64> =
            [("sm".to_string(), 576.0), ("md".to_string(), 768.0), ("lg".to_string(), 992.0)].into_iter().collect();
        BreakpointTable::new(&config).unwrap()
    }

    fn working(breakpoint: &str, selector: &str, declarations: Declarations) -> WorkingSet {
        let mut set = WorkingSet::new();
        set.entry(breakpoint.to_string()).or_default().insert(selector.to_string(), declarations);
        set
    }

    #[test]
    fn wraps_up_and_down_breakpoints() {
        let t = table();
        let ext = PropertyExtensions::new();
        let padding = props! { "padding-top" => "2px", "padding-bottom" => "2px" };
        let decls = Declarations::new(padding.clone(), true);

        let up = working("md-up", r#"[class*="md-up:padding=2"]"#, decls);
        assert_eq!(
            StyleSerializer::new(&ext).render(&up, t.get("md-up").unwrap()),
            r#"@media (min-width: 768px) {[class*="md-up:padding=2"]{padding-top:2px !important;padding-bottom:2px !important;}}"#
        );

        let down = working("sm-down", ".a", Declarations::new(padding, false));
        assert_eq!(
            StyleSerializer::new(&ext).render(&down, t.get("sm-down").unwrap()),
            "@media (max-width: 767.98px) {.a{padding-top:2px;padding-bottom:2px;}}"
        );
    }

    #[test]
    fn minimum_breakpoint_is_unwrapped() {
        let t = table();
        let ext = PropertyExtensions::new();
        let set = working("sm-up", ".a", Declarations::new(props! { "color" => "red" }, false));
        assert_eq!(StyleSerializer::new(&ext).render(&set, t.minimum()), ".a{color:red;}");
    }

    #[test]
    fn empty_breakpoints_render_nothing() {
        let t = table();
        let ext = PropertyExtensions::new();
        let set = working("md-up", ".a", Declarations::new(props! {}, true));
        assert_eq!(StyleSerializer::new(&ext).render(&set, t.get("md-up").unwrap()), "");
        assert_eq!(StyleSerializer::new(&ext).render(&set, t.get("lg-up").unwrap()), "");
    }

    #[test]
    fn existing_important_is_not_doubled() {
        let t = table();
        let ext = PropertyExtensions::new();
        let set = working(
            "sm-up",
            ".a",
            Declarations::new(props! { "color" => "red !important", "margin" => "0" }, true),
        );
        assert_eq!(StyleSerializer::new(&ext).render(&set, t.minimum()), ".a{color:red !important;margin:0 !important;}");
    }

    #[test]
    fn extensions_expand_properties() {
        let t = table();
        let mut ext = PropertyExtensions::new();
        ext.insert(
            "margin-x".to_string(),
            Box::new(|_prop: &str, value: &str| format!("margin-left:{value};margin-right:{value};")),
        );
        let set = working("sm-up", ".a", Declarations::new(props! { "margin-x" => "4px" }, false));
        assert_eq!(StyleSerializer::new(&ext).render(&set, t.minimum()), ".a{margin-left:4px;margin-right:4px;}");
    }
}
