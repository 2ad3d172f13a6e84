//! Observable values.
//!
//! Two things about a compiler are worth watching from the outside: whether it
//! finished initializing, and what CSS it just appended. Both are exposed as
//! an [`Observable`]: a single current value plus callbacks that run
//! synchronously every time the value is set. There is no queue; a listener
//! that subscribes late only sees the current value through [`Observable::get`].

use crate::api::ScopeId;
use std::fmt;

/// One non-empty render handed to a style target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleAppended {
    pub breakpoint: String,
    pub css: String,
    /// `None` for the compiler's main target.
    pub scope: Option<ScopeId>,
}

type Listener<T> = Box<dyn Fn(&T)>;

pub struct Observable<T> {
    current: Option<T>,
    version: u64,
    listeners: Vec<Listener<T>>,
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Observable { current: None, version: 0, listeners: Vec::new() }
    }

    /// Replace the current value and notify every listener.
    pub fn set(&mut self, value: T) {
        for listener in &self.listeners {
            listener(&value);
        }
        self.current = Some(value);
        self.version += 1;
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Number of times the value has been set.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, listener: impl Fn(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("current", &self.current)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
