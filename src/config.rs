//! Compiler configuration.
//!
//! A [`Config`] is plain data deserialized from JSON. The built-in default
//! (`default_config.json`) supplies a breakpoint scale, selector keys, design
//! scales and a starter set of utilities; callers overlay their own sections
//! with [`Config::merge`].
//!
//! ```json
//! {
//!   "breakpoints": { "sm": 576, "md": 768 },
//!   "selectors":   { "hover": "&:hover", "dark": ".dark>>" },
//!   "variables":   { "spacing": { "1": "4px" } },
//!   "prefixes":    [ { "prefix": "m", "scale": "spacing", "properties": { "t": ["margin-top"] } } ],
//!   "utilities":   { "display": { "values": { "flex": { "display": "flex" } } } },
//!   "overrides":   { "*:display=flex": { "min-width": "0" } }
//! }
//! ```

use crate::registry::UtilityDefinition;
use crate::{PropertyMap, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const BUILTIN: &str = include_str!("default_config.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Breakpoint name -> pixel threshold.
    pub breakpoints: IndexMap<String, f64>,
    /// Selector key -> selector fragment.
    pub selectors: IndexMap<String, String>,
    /// Scale name -> (scale token -> CSS value).
    pub variables: IndexMap<String, IndexMap<String, String>>,
    pub utilities: IndexMap<String, UtilityDefinition>,
    /// `breakpoint:key=value` patterns (any axis may be `*`) -> properties.
    pub overrides: IndexMap<String, PropertyMap>,
    pub prefixes: Vec<PrefixList>,
}

/// Expands one prefix into a family of utilities, one per `properties` suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixList {
    pub prefix: String,
    /// Name of a scale in [`Config::variables`].
    pub scale: Option<String>,
    /// Extra (or overriding) scale entries.
    pub values: IndexMap<String, String>,
    /// Suffix -> CSS properties receiving the value.
    pub properties: IndexMap<String, Vec<String>>,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The embedded default configuration.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    /// Overlay `other` onto `self`.
    ///
    /// A non-empty breakpoint table replaces the current one wholesale. Every other map is
    /// merged key-by-key, utilities property-by-property, prefix lists are
    /// appended.
    pub fn merge(&mut self, other: Config) {
        if !other.breakpoints.is_empty() {
            self.breakpoints = other.breakpoints;
        }
        self.selectors.extend(other.selectors);
        for (name, scale) in other.variables {
            self.variables.entry(name).or_default().extend(scale);
        }
        for (key, def) in other.utilities {
            match self.utilities.get_mut(&key) {
                Some(existing) => existing.merge(def),
                None => {
                    self.utilities.insert(key, def);
                }
            }
        }
        self.overrides.extend(other.overrides);
        self.prefixes.extend(other.prefixes);
    }
}
