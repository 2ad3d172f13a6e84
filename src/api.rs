use crate::engine::{CompilePass, PassResult, PropertyExtension, PropertyExtensions, RuleCache, split_tokens};
use crate::notify::{Observable, StyleAppended};
use crate::registry::{UtilityDefinition, UtilityRegistry};
use crate::rtl::mirror_registry;
use crate::target::{StyleSheet, StyleTarget};
use crate::{BreakpointTable, CompileMetrics, Config, PrefixList, Result, extract_class_tokens};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Initialization options.
///
/// ```
/// use utilcss::{Compiler, Options, StyleSheet};
///
/// let mut compiler = Compiler::new();
/// let mut options = Options::new(StyleSheet::new());
/// options.whitelist = vec!["hidden".to_string()];
/// compiler.init(options).unwrap();
///
/// assert!(compiler.target().unwrap().to_css().contains("display:none"));
/// ```
pub struct Options<T> {
    /// Where the compiler appends CSS.
    pub target: T,
    /// When false, initialization and every later compile call do nothing.
    pub enabled: bool,
    /// Start from the embedded default configuration.
    pub builtin: bool,
    /// Configuration overlaid on the default one.
    pub config: Option<Config>,
    /// Utility definitions merged over everything else.
    pub registry_overrides: IndexMap<String, UtilityDefinition>,
    /// Tokens compiled right after initialization.
    pub whitelist: Vec<String>,
    /// Mirror the registry for right-to-left documents.
    pub rtl: bool,
    /// Extra prefix lists expanded into utilities.
    pub prefixes: Vec<PrefixList>,
    /// Custom serializers keyed by CSS property name.
    pub extensions: HashMap<String, PropertyExtension>,
}

impl<T> Options<T> {
    pub fn new(target: T) -> Self {
        Options {
            target,
            enabled: true,
            builtin: true,
            config: None,
            registry_overrides: IndexMap::new(),
            whitelist: Vec::new(),
            rtl: false,
            prefixes: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Register a custom serializer for `property`.
    pub fn extension(mut self, property: &str, extend: impl Fn(&str, &str) -> String + 'static) -> Self {
        self.extensions.insert(property.to_string(), Box::new(extend));
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("target", &self.target)
            .field("enabled", &self.enabled)
            .field("builtin", &self.builtin)
            .field("config", &self.config)
            .field("registry_overrides", &self.registry_overrides)
            .field("whitelist", &self.whitelist)
            .field("rtl", &self.rtl)
            .field("prefixes", &self.prefixes)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Tokens for one compile call: a pre-split list or a whitespace-delimited string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenInput {
    List(Vec<String>),
    Text(String),
}

impl TokenInput {
    fn into_tokens(self) -> Vec<String> {
        match self {
            TokenInput::List(tokens) => tokens,
            TokenInput::Text(text) => split_tokens(&text),
        }
    }
}

impl From<&str> for TokenInput {
    fn from(text: &str) -> Self {
        TokenInput::Text(text.to_string())
    }
}

impl From<String> for TokenInput {
    fn from(text: String) -> Self {
        TokenInput::Text(text)
    }
}

impl From<Vec<String>> for TokenInput {
    fn from(tokens: Vec<String>) -> Self {
        TokenInput::List(tokens)
    }
}

impl From<Vec<&str>> for TokenInput {
    fn from(tokens: Vec<&str>) -> Self {
        TokenInput::List(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TokenInput {
    fn from(tokens: &[&str]) -> Self {
        TokenInput::List(tokens.iter().map(|t| t.to_string()).collect())
    }
}

/// CSS produced for one breakpoint by one compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub breakpoint: String,
    pub css: String,
}

/// Result of [`Compiler::compile_verbose`].
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub emitted: Vec<Emitted>,
    pub metrics: CompileMetrics,
}

impl CompileOutput {
    /// All emitted CSS, concatenated in cascade order.
    pub fn css(&self) -> String {
        self.emitted.iter().map(|e| e.css.as_str()).collect()
    }
}

/// Handle to an isolated scope created with [`Compiler::create_scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// An isolated (shadow-tree) rendering target with its own fingerprint partition.
#[derive(Debug)]
struct Scope<T> {
    target: T,
    cache: RuleCache,
}

/// State built by a successful initialization.
struct Engine {
    breakpoints: BreakpointTable,
    registry: UtilityRegistry,
    extensions: PropertyExtensions,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("breakpoints", &self.breakpoints.len())
            .field("utilities", &self.registry.len())
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Disabled,
    Ready(Box<Engine>),
}

/// The token-to-CSS compiler.
///
/// ```text
/// Compiler
/// ├─ state       Uninitialized | Disabled | Ready(breakpoints, registry, extensions)
/// ├─ target      main style target          ┐ main partition
/// ├─ cache       fingerprints + working set ┘
/// ├─ scopes      ScopeId -> (target, cache)   one partition per scope
/// ├─ pending     calls made before init, flushed in order by init
/// └─ observables initialized, appended
/// ```
///
/// Compile calls made before [`Compiler::init`] are queued and return no
/// output; they are compiled, in arrival order, as soon as initialization
/// completes.
#[derive(Debug)]
pub struct Compiler<T: StyleTarget = StyleSheet> {
    state: State,
    target: Option<T>,
    cache: RuleCache,
    scopes: IndexMap<ScopeId, Scope<T>>,
    next_scope: u32,
    pending: Vec<(Vec<String>, Option<ScopeId>)>,
    initialized: Observable<bool>,
    appended: Observable<StyleAppended>,
}

impl<T: StyleTarget> Default for Compiler<T> {
    fn default() -> Self {
        Compiler {
            state: State::Uninitialized,
            target: None,
            cache: RuleCache::new(),
            scopes: IndexMap::new(),
            next_scope: 0,
            pending: Vec::new(),
            initialized: Observable::new(),
            appended: Observable::new(),
        }
    }
}

impl<T: StyleTarget> Compiler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build breakpoints and registry from `options`, then compile the
    /// whitelist and any queued calls.
    ///
    /// Re-initializing replaces the main target, empties every scope target
    /// and forgets every fingerprint (main and scoped), so previously emitted
    /// rules are emitted again.
    pub fn init(&mut self, options: Options<T>) -> Result<()> {
        let Options { target, enabled, builtin, config, registry_overrides, whitelist, rtl, prefixes, extensions } =
            options;

        if !enabled {
            tracing::debug!("compiler disabled");
            self.state = State::Disabled;
            self.pending.clear();
            return Ok(());
        }

        let mut merged = if builtin { Config::builtin()? } else { Config::default() };
        if let Some(overlay) = config {
            merged.merge(overlay);
        }
        merged.merge(Config { utilities: registry_overrides, prefixes, ..Config::default() });

        let breakpoints = BreakpointTable::new(&merged.breakpoints)?;
        let mut registry = UtilityRegistry::from_config(&merged)?;
        if rtl {
            registry = mirror_registry(&registry);
        }

        self.target = Some(target);
        self.cache.clear();
        for scope in self.scopes.values_mut() {
            scope.cache.clear();
            scope.target.clear();
        }
        self.state = State::Ready(Box::new(Engine { breakpoints, registry, extensions }));
        tracing::debug!(rtl, whitelist = whitelist.len(), pending = self.pending.len(), "compiler initialized");

        if !whitelist.is_empty() {
            self.run(&whitelist, None)?;
        }
        for (tokens, scope) in std::mem::take(&mut self.pending) {
            self.run(&tokens, scope)?;
        }

        self.initialized.set(true);
        Ok(())
    }

    /// Compile tokens into the main target, or into `scope`'s target.
    ///
    /// Returns the CSS appended by this call, per breakpoint. Tokens that were
    /// already emitted into the same partition produce nothing.
    pub fn compile(&mut self, input: impl Into<TokenInput>, scope: Option<ScopeId>) -> Result<Vec<Emitted>> {
        Ok(self.compile_verbose(input, scope)?.emitted)
    }

    /// Like [`Compiler::compile`], with pass metrics.
    pub fn compile_verbose(&mut self, input: impl Into<TokenInput>, scope: Option<ScopeId>) -> Result<CompileOutput> {
        let tokens = input.into().into_tokens();
        match self.state {
            State::Uninitialized => {
                tracing::debug!(tokens = tokens.len(), "compile queued until init");
                self.pending.push((tokens, scope));
                Ok(CompileOutput::default())
            }
            State::Disabled => Ok(CompileOutput::default()),
            State::Ready(_) => {
                let PassResult { emitted, metrics } = self.run(&tokens, scope)?;
                Ok(CompileOutput { emitted, metrics })
            }
        }
    }

    /// Compile every class token found in `markup`.
    pub fn compile_markup(&mut self, markup: &str, scope: Option<ScopeId>) -> Result<Vec<Emitted>> {
        self.compile(extract_class_tokens(markup), scope)
    }

    fn run(&mut self, tokens: &[String], scope: Option<ScopeId>) -> Result<PassResult> {
        let State::Ready(engine) = &self.state else {
            return Ok(PassResult::default());
        };

        let (cache, mut target) = match scope {
            Some(id) => match self.scopes.get_mut(&id) {
                Some(scope) => (&mut scope.cache, Some(&mut scope.target)),
                None => {
                    tracing::debug!(%id, "compile into unknown scope ignored");
                    return Ok(PassResult::default());
                }
            },
            None => (&mut self.cache, self.target.as_mut()),
        };

        let result =
            CompilePass::new(&engine.breakpoints, &engine.registry, &engine.extensions).run(tokens, cache, scope.is_some())?;

        for emitted in &result.emitted {
            if let (Some(target), Some(breakpoint)) = (&mut target, engine.breakpoints.get(&emitted.breakpoint)) {
                target.append(breakpoint, &emitted.css);
            }
            self.appended.set(StyleAppended { breakpoint: emitted.breakpoint.clone(), css: emitted.css.clone(), scope });
        }
        Ok(result)
    }

    /// Register an isolated target. Its rules are rendered for a shadow
    /// host and deduplicated independently of every other partition.
    pub fn create_scope(&mut self, target: T) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.scopes.insert(id, Scope { target, cache: RuleCache::new() });
        id
    }

    /// Remove a scope and hand its target back.
    pub fn drop_scope(&mut self, id: ScopeId) -> Option<T> {
        self.scopes.shift_remove(&id).map(|scope| scope.target)
    }

    /// The main target (`None` before initialization).
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn scope_target(&self, id: ScopeId) -> Option<&T> {
        self.scopes.get(&id).map(|scope| &scope.target)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, State::Disabled)
    }

    /// Number of compile calls waiting for initialization.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn breakpoints(&self) -> Option<&BreakpointTable> {
        match &self.state {
            State::Ready(engine) => Some(&engine.breakpoints),
            _ => None,
        }
    }

    pub fn registry(&self) -> Option<&UtilityRegistry> {
        match &self.state {
            State::Ready(engine) => Some(&engine.registry),
            _ => None,
        }
    }

    /// Fires `true` once per successful initialization.
    pub fn initialized(&self) -> &Observable<bool> {
        &self.initialized
    }

    /// Fires once per non-empty render.
    pub fn appended(&self) -> &Observable<StyleAppended> {
        &self.appended
    }

    pub fn on_initialized(&mut self, listener: impl Fn(&bool) + 'static) {
        self.initialized.subscribe(listener);
    }

    pub fn on_appended(&mut self, listener: impl Fn(&StyleAppended) + 'static) {
        self.appended.subscribe(listener);
    }
}
