//! Property resolution.
//!
//! A token's declarations are assembled from several sources, applied as
//! layers in a fixed order:
//!
//! ```text
//! layer                                       kind
//! ─────────────────────────────────────────── ────────
//! 1  definition.common                        Base
//! 2  definition.values[value]                 Concrete
//! 3  definition.wildcard with payload         Concrete   (parametric values only)
//! 4  overrides  *:*=value                     Fallback
//!               bp:*=value                    Fallback
//!               *:key=*                       Fallback
//!               bp:key=*                      Fallback
//!               *:key=value                   Fallback
//! 5  overrides  bp:key=value                  Concrete   (literal escape hatch)
//! 6  token important flag                     (marks every resolved property)
//! ```
//!
//! - **Base** writes freely.
//! - **Concrete** writes and pins the property.
//! - **Fallback** writes only properties no concrete layer pinned; among
//!   fallbacks, later layers overwrite earlier ones.
//!
//! So an exact value entry always wins over an overlapping wildcard entry,
//! while wildcards still override the shared `common` properties.

use crate::registry::{Axis, OverridePattern, UtilityDefinition, UtilityRegistry, WILDCARD};
use crate::{Declarations, PropertyMap, Token};
use std::borrow::Cow;
use std::collections::HashSet;

/// Utility key whose parametric payload is substituted verbatim.
const CONTENT_KEY: &str = "content";
/// Utility keys whose payload rows become quoted grid-area strings.
const GRID_TEMPLATE_KEYS: &[&str] = &["grid-template-areas", "grid-areas"];
/// Separates values (or grid rows) inside a parametric payload.
const PAYLOAD_SEPARATOR: char = '|';
/// Separates cells inside one grid row.
const GRID_CELL_SEPARATOR: char = '_';

#[derive(Debug)]
enum Layer<'a> {
    Base(&'a PropertyMap),
    Concrete(Cow<'a, PropertyMap>),
    Fallback(&'a PropertyMap),
}

#[derive(Debug, Default)]
struct Layered {
    properties: PropertyMap,
    pinned: HashSet<String>,
}

impl Layered {
    fn apply(&mut self, layer: Layer<'_>) {
        match layer {
            Layer::Base(props) => {
                self.properties.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Layer::Concrete(props) => {
                for (k, v) in props.iter() {
                    self.properties.insert(k.clone(), v.clone());
                    self.pinned.insert(k.clone());
                }
            }
            Layer::Fallback(props) => {
                for (k, v) in props {
                    if !self.pinned.contains(k) {
                        self.properties.insert(k.clone(), v.clone());
                    }
                }
            }
        }
    }
}

/// Resolve the declarations for `token`.
///
/// Valueless tokens use the definition's default value for the token's
/// breakpoint; without one, only `common` (and valueless overrides) apply.
pub(crate) fn resolve_declarations(token: &Token, def: &UtilityDefinition, registry: &UtilityRegistry) -> Declarations {
    let value = token.value.as_deref().or_else(|| def.default_for(&token.breakpoint));
    let mut layered = Layered::default();

    layered.apply(Layer::Base(&def.common));

    if let Some(props) = value.and_then(|v| def.values.get(v)) {
        layered.apply(Layer::Concrete(Cow::Borrowed(props)));
    }

    if let (Some(payload), Some(template)) = (token.payload(), &def.wildcard) {
        let substituted = substitute(template, &token.key, payload);
        layered.apply(Layer::Concrete(Cow::Owned(substituted)));
    }

    let bp = || Axis::Exact(token.breakpoint.clone());
    let key = || Axis::Exact(token.key.clone());
    let val = || value.map_or(Axis::Absent, |v| Axis::Exact(v.to_string()));

    let mut broadened = vec![
        OverridePattern::new(Axis::Any, Axis::Any, val()),
        OverridePattern::new(bp(), Axis::Any, val()),
    ];
    if value.is_some() {
        broadened.push(OverridePattern::new(Axis::Any, key(), Axis::Any));
        broadened.push(OverridePattern::new(bp(), key(), Axis::Any));
    }
    broadened.push(OverridePattern::new(Axis::Any, key(), val()));

    for pattern in &broadened {
        if let Some(props) = registry.override_entry(pattern) {
            tracing::trace!(token = %token.raw, ?pattern, "wildcard override applied");
            layered.apply(Layer::Fallback(props));
        }
    }

    if let Some(props) = registry.override_entry(&OverridePattern::new(bp(), key(), val())) {
        layered.apply(Layer::Concrete(Cow::Borrowed(props)));
    }

    Declarations::new(layered.properties, token.is_important())
}

/// Fill the `*` slots of a parametric template.
///
/// ```text
/// key "width",               payload "calc(100%|-|8px)" -> calc(100% - 8px)
/// key "content",             payload "\"→\""            -> "→"  (verbatim)
/// key "grid-template-areas", payload "head_head|nav_main" -> "head head" "nav main"
/// ```
fn substitute(template: &PropertyMap, key: &str, payload: &str) -> PropertyMap {
    let replacement = if key == CONTENT_KEY {
        payload.to_string()
    } else if GRID_TEMPLATE_KEYS.contains(&key) {
        payload
            .split(PAYLOAD_SEPARATOR)
            .map(|row| format!("\"{}\"", row.replace(GRID_CELL_SEPARATOR, " ")))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        payload.replace(PAYLOAD_SEPARATOR, " ")
    };

    template.iter().map(|(prop, value)| (prop.clone(), value.replace(WILDCARD, &replacement))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::BreakpointTable;
    use crate::engine::tokenizer::Tokenizer;
    use crate::Config;

    fn resolve(config: &str, raw: &str) -> Declarations {
        let config = Config::from_json(config).unwrap();
        let bps = BreakpointTable::new(&config.breakpoints).unwrap();
        let registry = UtilityRegistry::from_config(&config).unwrap();
        let token = Tokenizer::new(&bps, &registry).tokenize(raw, false).unwrap();
        resolve_declarations(&token, registry.get(&token.key).unwrap(), &registry)
    }

    const LAYERS: &str = r#"{
        "breakpoints": {"sm": 576, "md": 768},
        "utilities": {
            "box": {
                "common": {"box-sizing": "border-box", "outline": "none"},
                "values": {"a": {"color": "red", "outline": "1px solid"}},
                "defaults": {"md-up": "a"}
            }
        },
        "overrides": {
            "*:*=a": {"color": "wild-any", "margin": "1px"},
            "md-up:*=a": {"margin": "2px"},
            "*:box=*": {"color": "wild-value", "outline": "dotted", "box-sizing": "content-box"},
            "md-up:box=*": {"padding": "3px"},
            "*:box=a": {"padding": "4px"},
            "md-up:box=a": {"color": "literal"}
        }
    }"#;

    #[test]
    fn exact_entries_beat_overlapping_wildcards() {
        let decls = resolve(LAYERS, "sm-up:box=a");
        assert_eq!(decls.properties["color"], "red");
        assert_eq!(decls.properties["outline"], "1px solid");
        // wildcard overrides common, but not concrete entries
        assert_eq!(decls.properties["box-sizing"], "content-box");
        assert_eq!(decls.properties["margin"], "1px");
        assert_eq!(decls.properties["padding"], "4px");
    }

    #[test]
    fn later_fallbacks_overwrite_earlier_ones() {
        let decls = resolve(LAYERS, "md-up:box=a");
        assert_eq!(decls.properties["margin"], "2px");
        assert_eq!(decls.properties["padding"], "4px");
    }

    #[test]
    fn literal_override_is_highest_precedence() {
        let decls = resolve(LAYERS, "md-up:box=a!");
        assert_eq!(decls.properties["color"], "literal");
        assert!(decls.is_important("color"));
    }

    #[test]
    fn valueless_tokens_use_breakpoint_default() {
        let with_default = resolve(LAYERS, "md-up:box");
        assert_eq!(with_default.properties["color"], "literal");

        let common_only = resolve(LAYERS, "sm-up:box");
        assert_eq!(
            common_only.properties,
            props! { "box-sizing" => "border-box", "outline" => "none" }
        );
    }

    const PARAMETRIC: &str = r#"{
        "breakpoints": {"sm": 576},
        "utilities": {
            "width": {"values": {"full": {"width": "100%"}}, "wildcard": {"width": "*", "max-width": "*"}},
            "content": {"wildcard": {"content": "*"}},
            "grid-template-areas": {"wildcard": {"grid-template-areas": "*"}}
        }
    }"#;

    #[test]
    fn parametric_values_fill_wildcard_template() {
        let decls = resolve(PARAMETRIC, "width=(calc(100%|-|8px))");
        assert_eq!(decls.properties, props! { "width" => "calc(100% - 8px)", "max-width" => "calc(100% - 8px)" });
    }

    #[test]
    fn content_payload_is_verbatim() {
        let decls = resolve(PARAMETRIC, r#"content=("a|b")"#);
        assert_eq!(decls.properties["content"], r#""a|b""#);
    }

    #[test]
    fn grid_payload_becomes_quoted_rows() {
        let decls = resolve(PARAMETRIC, "grid-template-areas=(head_head|nav_main)");
        assert_eq!(decls.properties["grid-template-areas"], r#""head head" "nav main""#);
    }

    #[test]
    fn unknown_plain_values_resolve_empty() {
        assert!(resolve(PARAMETRIC, "width=huge").is_empty());
    }
}
