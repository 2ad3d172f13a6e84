//! Responsive breakpoint table.
//!
//! Configuration names each breakpoint once with a pixel threshold. The table
//! derives two directional variants per name:
//!
//! ```text
//! config: { sm: 576, md: 768, lg: 992 }
//!
//! sm-up   min-width 576       sm-down  max-width 767.98   (md - 0.02)
//! md-up   min-width 768       md-down  max-width 991.98   (lg - 0.02)
//! lg-up   min-width 992       (the maximum has no "-down")
//! ```
//!
//! The smallest "-up" variant is the *minimum* breakpoint. It is always active,
//! so its rules are emitted without a media-query wrapper.
//!
//! Entries are stored in cascade order: "-up" ascending, then "-down"
//! descending, so that later (narrower) rules win in the document.

use crate::{Error, Result};
use indexmap::IndexMap;

const DOWN_OFFSET: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Direction::Up => "-up",
            Direction::Down => "-down",
        }
    }

    fn feature(self) -> &'static str {
        match self {
            Direction::Up => "min-width",
            Direction::Down => "max-width",
        }
    }
}

/// A derived, directional breakpoint such as `md-up`.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    name: String,
    base: String,
    direction: Direction,
    threshold: f64,
    rank: usize,
}

impl Breakpoint {
    /// Full derived name, e.g. `md-down`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured name the variant was derived from, e.g. `md`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Pixel threshold (the `min-width` / `max-width` value).
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Position in cascade order; the minimum breakpoint is 0.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn is_minimum(&self) -> bool {
        self.rank == 0
    }

    /// Media condition for this breakpoint, e.g. `(min-width: 768px)`.
    pub fn media_query(&self) -> String {
        format!("({}: {}px)", self.direction.feature(), self.threshold)
    }
}

/// Comparison operators for [`BreakpointTable::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Lte,
    Eq,
    Gte,
    Gt,
}

/// Immutable table of derived breakpoints.
#[derive(Debug, Clone)]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Derive the table from configured `name -> threshold` pairs.
    ///
    /// Thresholds are totally ordered; ties keep configuration order.
    pub fn new(config: &IndexMap<String, f64>) -> Result<Self> {
        if config.is_empty() {
            return Err(Error::NoBreakpoints);
        }
        if let Some((name, _)) = config.iter().find(|(_, t)| !t.is_finite()) {
            return Err(Error::InvalidBreakpoint { name: name.clone() });
        }

        let mut sorted: Vec<(&String, f64)> = config.iter().map(|(n, t)| (n, *t)).collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut entries = Vec::with_capacity(sorted.len() * 2 - 1);
        for (base, threshold) in &sorted {
            entries.push(Self::derive(base, Direction::Up, *threshold));
        }
        for pair in sorted.windows(2).rev() {
            let (base, _) = pair[0];
            let (_, next) = pair[1];
            entries.push(Self::derive(base, Direction::Down, round2(next - DOWN_OFFSET)));
        }
        for (rank, bp) in entries.iter_mut().enumerate() {
            bp.rank = rank;
        }

        Ok(BreakpointTable { entries })
    }

    fn derive(base: &str, direction: Direction, threshold: f64) -> Breakpoint {
        Breakpoint { name: format!("{base}{}", direction.suffix()), base: base.to_string(), direction, threshold, rank: 0 }
    }

    /// All breakpoints in cascade order.
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The always-active, wrapper-free breakpoint (smallest "-up").
    pub fn minimum(&self) -> &Breakpoint {
        &self.entries[0]
    }

    /// The largest "-up" breakpoint (the one without a "-down" variant).
    pub fn maximum(&self) -> &Breakpoint {
        self.entries.iter().filter(|b| b.direction == Direction::Up).last().unwrap_or(&self.entries[0])
    }

    /// Exact lookup; `None` is the "no match" sentinel.
    pub fn get(&self, name: &str) -> Option<&Breakpoint> {
        self.entries.iter().find(|b| b.name == name)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Media condition for `name`, or `None` for unknown names.
    pub fn media_query(&self, name: &str) -> Option<String> {
        self.get(name).map(Breakpoint::media_query)
    }

    /// Nearest valid breakpoint: exact name, then a bare configured name
    /// (`md` -> `md-up`), then the minimum. Never fails.
    pub fn nearest(&self, name: &str) -> &Breakpoint {
        self.get(name)
            .or_else(|| self.entries.iter().find(|b| b.direction == Direction::Up && b.base == name))
            .unwrap_or_else(|| self.minimum())
    }

    /// Does `current` satisfy `op` against `target`? Compares thresholds;
    /// unknown names never satisfy anything.
    ///
    /// ```text
    /// compare("lg-up", Gte, "md-up") -> 992 >= 768 -> true
    /// ```
    pub fn compare(&self, current: &str, op: Comparison, target: &str) -> bool {
        let (Some(current), Some(target)) = (self.get(current), self.get(target)) else {
            return false;
        };
        let (a, b) = (current.threshold, target.threshold);
        match op {
            Comparison::Lt => a < b,
            Comparison::Lte => a <= b,
            Comparison::Eq => a == b,
            Comparison::Gte => a >= b,
            Comparison::Gt => a > b,
        }
    }

    /// The widest "-up" breakpoint active at `width` pixels (the minimum
    /// when `width` is below every threshold).
    pub fn for_width(&self, width: f64) -> &Breakpoint {
        self.entries
            .iter()
            .filter(|b| b.direction == Direction::Up && b.threshold <= width)
            .last()
            .unwrap_or_else(|| self.minimum())
    }

    /// Longest breakpoint name that prefixes `text` and is followed by the
    /// key separator or the end of `text`.
    pub(crate) fn match_prefix(&self, text: &str) -> Option<&Breakpoint> {
        self.entries
            .iter()
            .filter(|b| {
                text.strip_prefix(b.name.as_str()).is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
            })
            .max_by_key(|b| b.name.len())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
