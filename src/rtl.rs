//! Right-to-left mirroring.
//!
//! Runs once at initialization when RTL is enabled and builds a mirrored
//! *copy* of the registry; the input registry is never touched.
//!
//! ```text
//! per definition
//!   1. merge its `rtl` block      values per key, common, wildcard replaced
//!   2. mirror every PropertyMap   (values, common, wildcard)
//! per override
//!   2. mirror its PropertyMap
//!
//! mirror(PropertyMap)
//!   property names   margin-left  -> margin-right
//!   values           "left"       -> "right"       (and vice versa)
//!   transform        translate(10px, 0) -> translate(-10px, 0)
//!                    translateX / translate3d likewise, first argument only
//! ```
//!
//! Utility keys, value tokens and selectors keep their names: `float=left`
//! stays the token `float=left` and renders `float:right`.

use crate::registry::{UtilityDefinition, UtilityRegistry};
use crate::PropertyMap;
use regex::Captures;

const TRANSFORM_PROPERTY: &str = "transform";

/// Build the right-to-left counterpart of `registry`.
pub fn mirror_registry(registry: &UtilityRegistry) -> UtilityRegistry {
    let utilities = registry.utilities().map(|(key, def)| (key.clone(), mirror_definition(def))).collect();
    let overrides = registry.overrides().map(|(pattern, props)| (pattern.clone(), mirror_properties(props))).collect();
    tracing::debug!(utilities = registry.len(), "registry mirrored for right-to-left");
    UtilityRegistry::from_parts(utilities, overrides, registry.selectors().clone())
}

fn mirror_definition(def: &UtilityDefinition) -> UtilityDefinition {
    let mut merged = def.clone();
    if let Some(rtl) = merged.rtl.take() {
        for (value, props) in rtl.values {
            merged.values.entry(value).or_default().extend(props);
        }
        merged.common.extend(rtl.common);
        if rtl.wildcard.is_some() {
            merged.wildcard = rtl.wildcard;
        }
    }

    let values = merged.values.iter().map(|(value, props)| (value.clone(), mirror_properties(props))).collect();
    let common = mirror_properties(&merged.common);
    let wildcard = merged.wildcard.as_ref().map(mirror_properties);
    UtilityDefinition { values, common, wildcard, ..merged }
}

fn mirror_properties(props: &PropertyMap) -> PropertyMap {
    props
        .iter()
        .map(|(prop, value)| {
            let prop = swap_sides(prop);
            let mut value = swap_sides(value);
            if prop == TRANSFORM_PROPERTY {
                value = flip_translate(&value);
            }
            (prop, value)
        })
        .collect()
}

/// Swap every `left` with `right` and vice versa, in one pass.
fn swap_sides(text: &str) -> String {
    regex!(r"left|right")
        .replace_all(text, |caps: &Captures| if &caps[0] == "left" { "right" } else { "left" })
        .into_owned()
}

/// Negate the horizontal offset of `translate`, `translateX` and
/// `translate3d`. Zero offsets are left alone.
fn flip_translate(value: &str) -> String {
    regex!(r"(translate(?:X|3d)?\(\s*)(-?)([0-9]*\.?[0-9]+)")
        .replace_all(value, |caps: &Captures| {
            let number = &caps[3];
            if number.parse::<f64>().is_ok_and(|n| n == 0.0) {
                return caps[0].to_string();
            }
            let sign = if caps[2].is_empty() { "-" } else { "" };
            format!("{}{}{}", &caps[1], sign, number)
        })
        .into_owned()
}
