extern crate self as utilcss;

use indexmap::{IndexMap, IndexSet};

#[macro_use]
mod macros;
mod api;
mod breakpoints;
mod config;
mod engine;
mod error;
mod extract;
mod notify;
mod registry;
mod rtl;
mod target;

pub use api::{CompileOutput, Compiler, Emitted, Options, ScopeId, TokenInput};
pub use breakpoints::{Breakpoint, BreakpointTable, Comparison, Direction};
pub use config::{Config, PrefixList};
pub use engine::{CompileMetrics, PropertyExtension, unify_utility_classes};
pub use error::{Error, Result};
pub use extract::extract_class_tokens;
pub use notify::{Observable, StyleAppended};
pub use registry::{Axis, OverridePattern, RtlOverride, UtilityDefinition, UtilityRegistry};
pub use rtl::mirror_registry;
pub use target::{StyleSheet, StyleTarget};

/// CSS property name -> value, in declaration order.
pub type PropertyMap = IndexMap<String, String>;

// --- Internal types ---------------------------------------------------------

bitflags::bitflags! {
    /// Per-token switches decided while tokenizing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct TokenFlags: u8 {
        /// The token ended with the important marker (`!`).
        const IMPORTANT           = 1 << 0;
        /// The token is compiled into a scoped (shadow) target.
        const SCOPED              = 1 << 1;
        /// The value is a parenthesized custom payload, e.g. `(10px)`.
        const PARAMETRIC          = 1 << 2;
        /// A breakpoint was written in the token rather than defaulted.
        const EXPLICIT_BREAKPOINT = 1 << 3;
    }
}

/// A parsed utility token.
///
/// ```text
/// md-up:hover:color=red!
/// └─┬─┘ └─┬─┘ └─┬─┘ └┬┘│
///   │     │     │    │ └ IMPORTANT
///   │     │     │    └── value
///   │     │     └─────── key
///   │     └───────────── chain (selector qualifiers)
///   └─────────────────── breakpoint
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// The token text exactly as written (including a trailing `!`).
    pub raw: String,
    /// Name of the derived breakpoint (`md-up`, `sm-down`, ...).
    pub breakpoint: String,
    pub chain: Vec<String>,
    pub key: String,
    /// `None` means "apply the utility's default state".
    pub value: Option<String>,
    pub flags: TokenFlags,
}

impl Token {
    pub fn is_important(&self) -> bool {
        self.flags.contains(TokenFlags::IMPORTANT)
    }

    pub fn is_scoped(&self) -> bool {
        self.flags.contains(TokenFlags::SCOPED)
    }

    pub fn is_parametric(&self) -> bool {
        self.flags.contains(TokenFlags::PARAMETRIC)
    }

    /// The payload between the parentheses of a parametric value.
    pub fn payload(&self) -> Option<&str> {
        if !self.is_parametric() {
            return None;
        }
        self.value.as_deref().and_then(|v| v.strip_prefix('(')).and_then(|v| v.strip_suffix(')'))
    }

    /// Identifier used for attribute-substring matching: the written
    /// breakpoint (if any), the selector chain, the key and the value, without
    /// the important marker.
    pub fn base_identifier(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.chain.len() + 2);
        if self.flags.contains(TokenFlags::EXPLICIT_BREAKPOINT) {
            parts.push(&self.breakpoint);
        }
        parts.extend(self.chain.iter().map(String::as_str));
        parts.push(&self.key);

        let mut id = parts.join(":");
        if let Some(value) = &self.value {
            id.push('=');
            id.push_str(value);
        }
        id
    }
}

/// Resolved declarations for one selector.
///
/// Importance is tracked per property next to the values instead of inside
/// them; it is consulted when serializing and never emitted as a property.
/// Several tokens can share one selector (`:host`, literal selectors), so a
/// property is important only if the token that last wrote it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Declarations {
    pub properties: PropertyMap,
    /// Properties written by an important token.
    pub important: IndexSet<String>,
}

impl Declarations {
    /// Declarations from one token: every property shares its important flag.
    pub fn new(properties: PropertyMap, important: bool) -> Self {
        let important = if important { properties.keys().cloned().collect() } else { IndexSet::new() };
        Declarations { properties, important }
    }

    /// True when there is nothing to emit.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn is_important(&self, property: &str) -> bool {
        self.important.contains(property)
    }

    /// Additive merge: properties are added, same-named ones are overwritten
    /// together with their importance.
    pub fn merge(&mut self, other: Declarations) {
        let Declarations { properties, important } = other;
        for (prop, value) in properties {
            if important.contains(&prop) {
                self.important.insert(prop.clone());
            } else {
                self.important.shift_remove(&prop);
            }
            self.properties.insert(prop, value);
        }
    }

    /// Canonical text form used for fingerprinting.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (prop, value) in &self.properties {
            out.push_str(prop);
            out.push(':');
            out.push_str(value);
            if self.is_important(prop) {
                out.push_str("!important");
            }
            out.push(';');
        }
        out
    }
}
