//! Utility registry.
//!
//! The registry is the read-only dictionary the compiler consults for every
//! token. It is built once from a merged [`Config`] and never mutated during a
//! compile pass; the RTL pass (see `rtl.rs`) produces a mirrored *copy*.
//!
//! ```text
//! UtilityRegistry
//! ├─ utilities:  key -> UtilityDefinition
//! │               ├─ values    value-token -> PropertyMap   (concrete)
//! │               ├─ wildcard  PropertyMap with `*` slots    (parametric)
//! │               ├─ common    PropertyMap applied to every value
//! │               ├─ defaults  breakpoint -> value-token     (valueless tokens)
//! │               └─ selector  literal selector override
//! ├─ overrides:  OverridePattern -> PropertyMap              (broadened lookups)
//! └─ selectors:  selector key -> selector fragment
//! ```
//!
//! Wildcards are represented structurally: parametric templates live in
//! `UtilityDefinition::wildcard` rather than under a magic value key, and
//! override patterns are parsed into [`Axis`] values.

use crate::config::{Config, PrefixList};
use crate::engine::split_value;
use crate::{Error, PropertyMap, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder substituted by the payload of a parametric value.
pub(crate) const WILDCARD: &str = "*";

/// Breakpoint key in `defaults` that applies to every breakpoint.
const ANY_BREAKPOINT: &str = "*";

/// One utility key's definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityDefinition {
    /// Exact value token -> properties.
    pub values: IndexMap<String, PropertyMap>,
    /// Properties shared by every value of this utility.
    pub common: PropertyMap,
    /// Value token applied when a token carries no value, per breakpoint
    /// (`"*"` for all breakpoints).
    pub defaults: IndexMap<String, String>,
    /// Literal selector(s) replacing the generated class selector.
    pub selector: Option<String>,
    /// Template for parametric values; `*` is replaced by the payload.
    pub wildcard: Option<PropertyMap>,
    /// Entries merged over this definition before RTL mirroring.
    pub rtl: Option<RtlOverride>,
}

/// Right-to-left replacements for parts of a [`UtilityDefinition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtlOverride {
    pub values: IndexMap<String, PropertyMap>,
    pub common: PropertyMap,
    pub wildcard: Option<PropertyMap>,
}

impl UtilityDefinition {
    /// Value token to use for a valueless token at `breakpoint`.
    pub fn default_for(&self, breakpoint: &str) -> Option<&str> {
        self.defaults.get(breakpoint).or_else(|| self.defaults.get(ANY_BREAKPOINT)).map(String::as_str)
    }

    /// Overlay `other` onto `self`: value entries and common properties are
    /// merged property-by-property, scalar fields are replaced when set.
    pub fn merge(&mut self, other: UtilityDefinition) {
        for (value, props) in other.values {
            self.values.entry(value).or_default().extend(props);
        }
        self.common.extend(other.common);
        self.defaults.extend(other.defaults);
        if other.selector.is_some() {
            self.selector = other.selector;
        }
        if other.wildcard.is_some() {
            self.wildcard = other.wildcard;
        }
        if other.rtl.is_some() {
            self.rtl = other.rtl;
        }
    }
}

/// One axis of an override pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `*`: matches anything present.
    Any,
    Exact(String),
    /// The value axis of a valueless token.
    Absent,
}

impl Axis {
    fn parse(text: &str) -> Axis {
        if text == WILDCARD { Axis::Any } else { Axis::Exact(text.to_string()) }
    }
}

/// A parsed `breakpoint:key=value` override key.
///
/// ```text
/// "*:padding=2"    -> (Any,            Exact(padding), Exact(2))
/// "md-up:*=auto"   -> (Exact(md-up),   Any,            Exact(auto))
/// "md-up:row"      -> (Exact(md-up),   Exact(row),     Absent)
/// "padding=*"      -> (Any,            Exact(padding), Any)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverridePattern {
    pub breakpoint: Axis,
    pub key: Axis,
    pub value: Axis,
}

impl OverridePattern {
    pub fn new(breakpoint: Axis, key: Axis, value: Axis) -> Self {
        OverridePattern { breakpoint, key, value }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let (head, value) = split_value(text);
        let value = value.map_or(Axis::Absent, Axis::parse);
        let (breakpoint, key) = match head.rsplit_once(':') {
            Some((bp, key)) => (Axis::parse(bp), key),
            None => (Axis::Any, head),
        };
        if key.is_empty() || matches!(&breakpoint, Axis::Exact(bp) if bp.is_empty()) {
            return Err(Error::InvalidOverride(text.to_string()));
        }
        Ok(OverridePattern { breakpoint, key: Axis::parse(key), value })
    }
}

/// Read-only utility dictionary.
#[derive(Debug, Clone, Default)]
pub struct UtilityRegistry {
    utilities: IndexMap<String, UtilityDefinition>,
    overrides: IndexMap<OverridePattern, PropertyMap>,
    selectors: IndexMap<String, String>,
}

impl UtilityRegistry {
    /// Build the registry: prefix lists are expanded first, explicit
    /// utilities are merged over them.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = UtilityRegistry { selectors: config.selectors.clone(), ..Default::default() };

        for list in &config.prefixes {
            registry.extend_prefix_list(list, &config.variables)?;
        }
        for (key, def) in &config.utilities {
            registry.merge(key, def.clone());
        }
        for (pattern, props) in &config.overrides {
            registry.overrides.insert(OverridePattern::parse(pattern)?, props.clone());
        }

        tracing::debug!(
            utilities = registry.utilities.len(),
            overrides = registry.overrides.len(),
            selectors = registry.selectors.len(),
            "utility registry built"
        );
        Ok(registry)
    }

    /// Expand `prefix + suffix` utilities from a prefix list.
    ///
    /// ```text
    /// { prefix: "m", scale: "spacing", properties: { "x": [margin-left, margin-right] } }
    ///   -> "mx" = { values:   { "1": { margin-left: 4px, margin-right: 4px }, ... },
    ///               wildcard: { margin-left: *, margin-right: * } }
    /// ```
    pub fn extend_prefix_list(
        &mut self,
        list: &PrefixList,
        variables: &IndexMap<String, IndexMap<String, String>>,
    ) -> Result<()> {
        let mut scale: IndexMap<String, String> = match &list.scale {
            Some(name) => variables
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownScale { prefix: list.prefix.clone(), scale: name.clone() })?,
            None => IndexMap::new(),
        };
        scale.extend(list.values.clone());

        for (suffix, properties) in &list.properties {
            let key = format!("{}{}", list.prefix, suffix);
            let values = scale
                .iter()
                .map(|(token, css)| {
                    let props: PropertyMap = properties.iter().map(|p| (p.clone(), css.clone())).collect();
                    (token.clone(), props)
                })
                .collect();
            let wildcard: PropertyMap = properties.iter().map(|p| (p.clone(), WILDCARD.to_string())).collect();
            self.merge(&key, UtilityDefinition { values, wildcard: Some(wildcard), ..Default::default() });
        }
        Ok(())
    }

    /// Insert or overlay a definition.
    pub fn merge(&mut self, key: &str, def: UtilityDefinition) {
        match self.utilities.get_mut(key) {
            Some(existing) => existing.merge(def),
            None => {
                self.utilities.insert(key.to_string(), def);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&UtilityDefinition> {
        self.utilities.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.utilities.contains_key(key)
    }

    pub fn override_entry(&self, pattern: &OverridePattern) -> Option<&PropertyMap> {
        self.overrides.get(pattern)
    }

    pub fn selector_fragment(&self, key: &str) -> Option<&str> {
        self.selectors.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }

    pub fn utilities(&self) -> impl Iterator<Item = (&String, &UtilityDefinition)> {
        self.utilities.iter()
    }

    pub(crate) fn overrides(&self) -> impl Iterator<Item = (&OverridePattern, &PropertyMap)> {
        self.overrides.iter()
    }

    /// Assemble a registry from already-built parts (used by the RTL pass).
    pub(crate) fn from_parts(
        utilities: IndexMap<String, UtilityDefinition>,
        overrides: IndexMap<OverridePattern, PropertyMap>,
        selectors: IndexMap<String, String>,
    ) -> Self {
        UtilityRegistry { utilities, overrides, selectors }
    }

    pub(crate) fn selectors(&self) -> &IndexMap<String, String> {
        &self.selectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing() -> IndexMap<String, IndexMap<String, String>> {
        let scale: IndexMap<String, String> =
            [("1".to_string(), "4px".to_string()), ("2".to_string(), "8px".to_string())].into_iter().collect();
        [("spacing".to_string(), scale)].into_iter().collect()
    }

    #[test]
    fn prefix_list_expands_values_and_wildcard() {
        let list: PrefixList = serde_json::from_str(
            r#"{"prefix": "m", "scale": "spacing", "properties": {"": ["margin"], "x": ["margin-left", "margin-right"]}}"#,
        )
        .unwrap();
        let mut registry = UtilityRegistry::default();
        registry.extend_prefix_list(&list, &spacing()).unwrap();

        let mx = registry.get("mx").unwrap();
        assert_eq!(mx.values["2"], props! { "margin-left" => "8px", "margin-right" => "8px" });
        assert_eq!(mx.wildcard.as_ref().unwrap(), &props! { "margin-left" => "*", "margin-right" => "*" });
        assert_eq!(registry.get("m").unwrap().values["1"], props! { "margin" => "4px" });
    }

    #[test]
    fn prefix_list_with_unknown_scale_fails() {
        let list: PrefixList =
            serde_json::from_str(r#"{"prefix": "m", "scale": "nope", "properties": {"": ["margin"]}}"#).unwrap();
        let err = UtilityRegistry::default().extend_prefix_list(&list, &spacing()).unwrap_err();
        assert!(matches!(err, Error::UnknownScale { .. }));
    }

    #[test]
    fn explicit_utilities_merge_over_prefix_expansion() {
        let config: Config = serde_json::from_str(
            r#"{
                "variables": {"spacing": {"1": "4px"}},
                "prefixes": [{"prefix": "p", "scale": "spacing", "properties": {"": ["padding"]}}],
                "utilities": {"p": {"values": {"1": {"padding-block": "1px"}}, "defaults": {"*": "1"}}}
            }"#,
        )
        .unwrap();
        let registry = UtilityRegistry::from_config(&config).unwrap();
        let p = registry.get("p").unwrap();
        assert_eq!(p.values["1"], props! { "padding" => "4px", "padding-block" => "1px" });
        assert_eq!(p.default_for("md-up"), Some("1"));
        assert!(p.wildcard.is_some());
    }

    #[test]
    fn override_patterns_parse_axes() {
        assert_eq!(
            OverridePattern::parse("*:padding=2").unwrap(),
            OverridePattern::new(Axis::Any, Axis::Exact("padding".into()), Axis::Exact("2".into()))
        );
        assert_eq!(
            OverridePattern::parse("md-up:*=auto").unwrap(),
            OverridePattern::new(Axis::Exact("md-up".into()), Axis::Any, Axis::Exact("auto".into()))
        );
        assert_eq!(
            OverridePattern::parse("padding=*").unwrap(),
            OverridePattern::new(Axis::Any, Axis::Exact("padding".into()), Axis::Any)
        );
        assert_eq!(
            OverridePattern::parse("md-up:row").unwrap(),
            OverridePattern::new(Axis::Exact("md-up".into()), Axis::Exact("row".into()), Axis::Absent)
        );
        assert!(OverridePattern::parse("md-up:=2").is_err());
    }
}
