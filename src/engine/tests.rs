//! End-to-end compile behaviour through the public facade.

use crate::{Compiler, Config, Emitted, Options, StyleAppended, StyleSheet};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const CONFIG: &str = r#"{
    "breakpoints": {"sm": 576, "md": 768, "lg": 992},
    "selectors": {"hover": "&:hover", "dark": ".dark>>"},
    "variables": {"spacing": {"1": "1px", "2": "2px"}},
    "prefixes": [
        {"prefix": "p", "scale": "spacing", "properties": {"": ["padding"], "y": ["padding-top", "padding-bottom"]}}
    ],
    "utilities": {
        "padding": {"values": {"2": {"padding-top": "2px", "padding-bottom": "2px"}}},
        "color": {"values": {"red": {"color": "red"}}},
        "float": {"values": {"left": {"float": "left"}}},
        "margin-x": {"values": {"1": {"margin-x": "4px"}}},
        "hidden": {"values": {"true": {"display": "none"}}, "defaults": {"*": "true"}}
    }
}"#;

fn options() -> Options<StyleSheet> {
    let mut options = Options::new(StyleSheet::new());
    options.builtin = false;
    options.config = Some(Config::from_json(CONFIG).unwrap());
    options
}

fn compiler() -> Compiler {
    let mut compiler = Compiler::new();
    compiler.init(options()).unwrap();
    compiler
}

fn emitted(breakpoint: &str, css: &str) -> Emitted {
    Emitted { breakpoint: breakpoint.to_string(), css: css.to_string() }
}

#[test]
fn important_breakpoint_token_renders_media_block() {
    let mut c = compiler();
    let out = c.compile("md-up:padding=2!", None).unwrap();
    assert_eq!(
        out,
        vec![emitted(
            "md-up",
            r#"@media (min-width: 768px) {[class*="md-up:padding=2"]{padding-top:2px !important;padding-bottom:2px !important;}}"#
        )]
    );
}

#[test]
fn second_compile_of_same_tokens_emits_nothing() {
    let mut c = compiler();
    assert!(!c.compile("color=red md-up:padding=2", None).unwrap().is_empty());
    assert!(c.compile("color=red md-up:padding=2", None).unwrap().is_empty());
    assert!(c.compile(vec!["md-up:padding=2", "color=red"], None).unwrap().is_empty());
}

#[test]
fn breakpoints_render_in_cascade_order() {
    let mut c = compiler();
    let out = c.compile("md-down:color=red md-up:color=red color=red", None).unwrap();
    assert_eq!(
        out,
        vec![
            emitted("sm-up", r#"[class*="color=red"]{color:red;}"#),
            emitted("md-up", r#"@media (min-width: 768px) {[class*="md-up:color=red"]{color:red;}}"#),
            emitted("md-down", r#"@media (max-width: 991.98px) {[class*="md-down:color=red"]{color:red;}}"#),
        ]
    );
    assert_eq!(c.target().unwrap().to_css(), out.iter().map(|e| e.css.as_str()).collect::<String>());
}

#[test]
fn competing_tokens_collapse_to_last_written() {
    let mut c = compiler();
    let out = c.compile("color=red hover:color=red color=red!", None).unwrap();
    assert_eq!(
        out,
        vec![emitted("sm-up", r#"[class*="color=red"]{color:red !important;}[class*="hover:color=red"]:hover{color:red;}"#)]
    );
}

#[test]
fn unknown_and_empty_tokens_are_silent() {
    let mut c = compiler();
    assert!(c.compile("nope=1 color=blue md-up: !", None).unwrap().is_empty());
    assert!(c.target().unwrap().is_empty());
}

#[test]
fn valueless_tokens_use_defaults() {
    let mut c = compiler();
    let out = c.compile("lg-up:hidden", None).unwrap();
    assert_eq!(out, vec![emitted("lg-up", r#"@media (min-width: 992px) {[class*="lg-up:hidden"]{display:none;}}"#)]);
}

#[test]
fn prefix_lists_generate_scale_and_parametric_utilities() {
    let mut c = compiler();
    let out = c.compile("py=2 p=(3px|5px)", None).unwrap();
    assert_eq!(
        out,
        vec![emitted("sm-up", r#"[class*="py=2"]{padding-top:2px;padding-bottom:2px;}.p\=\(3px\|5px\){padding:3px 5px;}"#)]
    );
}

#[test]
fn calls_before_init_are_flushed_in_order() {
    let mut c: Compiler = Compiler::new();
    assert!(c.compile("color=red", None).unwrap().is_empty());
    assert!(c.compile("md-up:padding=2", None).unwrap().is_empty());
    assert_eq!(c.pending(), 2);

    let mut opts = options();
    opts.whitelist = vec!["hidden".to_string()];
    c.init(opts).unwrap();

    assert_eq!(c.pending(), 0);
    let sheet = c.target().unwrap();
    assert_eq!(sheet.get("sm-up"), Some(r#"[class*="hidden"]{display:none;}[class*="color=red"]{color:red;}"#));
    assert!(sheet.get("md-up").unwrap().contains("md-up:padding=2"));
}

#[test]
fn disabled_compiler_does_nothing() {
    let mut c = Compiler::new();
    let mut opts = options();
    opts.enabled = false;
    c.init(opts).unwrap();

    assert!(!c.is_enabled());
    assert!(c.compile("color=red", None).unwrap().is_empty());
    assert!(c.target().is_none());
    assert_eq!(c.initialized().get(), None);
}

#[test]
fn reinit_forgets_fingerprints() {
    let mut c = compiler();
    assert_eq!(c.compile("color=red", None).unwrap().len(), 1);
    c.init(options()).unwrap();
    assert_eq!(c.compile("color=red", None).unwrap().len(), 1);
    assert_eq!(c.initialized().version(), 2);
}

#[test]
fn rtl_mirrors_rendered_properties() {
    let mut c = Compiler::new();
    let mut opts = options();
    opts.rtl = true;
    c.init(opts).unwrap();

    let out = c.compile("float=left", None).unwrap();
    assert_eq!(out, vec![emitted("sm-up", r#"[class*="float=left"]{float:right;}"#)]);
}

#[test]
fn scopes_render_for_host_and_dedup_independently() {
    let mut c = compiler();
    let a = c.create_scope(StyleSheet::new());
    let b = c.create_scope(StyleSheet::new());

    assert_eq!(c.compile("hover:color=red", Some(a)).unwrap(), vec![emitted("sm-up", ":host(:hover){color:red;}")]);
    assert!(c.compile("hover:color=red", Some(a)).unwrap().is_empty());
    assert_eq!(c.compile("hover:color=red", Some(b)).unwrap().len(), 1);
    assert_eq!(
        c.compile("hover:color=red", None).unwrap(),
        vec![emitted("sm-up", r#"[class*="hover:color=red"]:hover{color:red;}"#)]
    );

    assert_eq!(c.scope_target(a).unwrap().to_css(), ":host(:hover){color:red;}");
    assert_eq!(c.target().unwrap().to_css(), r#"[class*="hover:color=red"]:hover{color:red;}"#);
}

#[test]
fn reinit_empties_scope_targets() {
    let mut c = compiler();
    let a = c.create_scope(StyleSheet::new());
    c.compile("color=red md-up:padding=2", Some(a)).unwrap();

    c.init(options()).unwrap();
    assert!(c.scope_target(a).unwrap().is_empty());

    assert_eq!(c.compile("color=red", Some(a)).unwrap(), vec![emitted("sm-up", ":host{color:red;}")]);
    assert_eq!(c.scope_target(a).unwrap().to_css(), ":host{color:red;}");
}

#[test]
fn importance_stays_with_its_own_properties_on_a_shared_selector() {
    let mut c = compiler();
    let a = c.create_scope(StyleSheet::new());
    assert_eq!(
        c.compile("color=red padding=2!", Some(a)).unwrap(),
        vec![emitted("sm-up", ":host{color:red;padding-top:2px !important;padding-bottom:2px !important;}")]
    );
}

#[test]
fn appended_fires_per_non_empty_render() {
    let mut c: Compiler = Compiler::new();
    let seen: Rc<RefCell<Vec<StyleAppended>>> = Rc::default();
    let sink = Rc::clone(&seen);
    c.on_appended(move |event| sink.borrow_mut().push(event.clone()));
    let inits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&inits);
    c.on_initialized(move |_| *counter.borrow_mut() += 1);

    c.init(options()).unwrap();
    c.compile("color=red md-up:color=red", None).unwrap();
    c.compile("color=red", None).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.iter().map(|e| e.breakpoint.as_str()).collect::<Vec<_>>(), vec!["sm-up", "md-up"]);
    assert!(seen.iter().all(|e| e.scope.is_none() && !e.css.is_empty()));
    assert_eq!(*inits.borrow(), 1);
}

#[test]
fn extensions_rewrite_properties() {
    let mut c = Compiler::new();
    c.init(options().extension("margin-x", |_, value| format!("margin-left:{value};margin-right:{value};"))).unwrap();

    let out = c.compile("margin-x=1!", None).unwrap();
    assert_eq!(
        out,
        vec![emitted("sm-up", r#"[class*="margin-x=1"]{margin-left:4px !important;margin-right:4px !important;}"#)]
    );
}

#[test]
fn markup_classes_are_compiled() {
    let mut c = compiler();
    let out = c.compile_markup(r#"<div class="color=red"><p class="md-up:padding=2 color=red"></p></div>"#, None).unwrap();
    assert_eq!(out.iter().map(|e| e.breakpoint.as_str()).collect::<Vec<_>>(), vec!["sm-up", "md-up"]);
}

#[test]
fn verbose_compile_reports_metrics() {
    let mut c = compiler();
    let first = c.compile_verbose("color=red nope=1 color=red", None).unwrap();
    assert_eq!(first.metrics.tokens, 2);
    assert_eq!(first.metrics.skipped, 1);
    assert_eq!(first.metrics.cached, 1);
    assert_eq!(first.metrics.rendered, 1);
    assert_eq!(first.css(), r#"[class*="color=red"]{color:red;}"#);

    let second = c.compile_verbose("color=red", None).unwrap();
    assert_eq!(second.metrics.deduplicated, 1);
    assert_eq!(second.metrics.cached, 0);
    assert_eq!(second.css(), "");
}

#[test]
fn builtin_configuration_compiles() {
    let mut c = Compiler::new();
    c.init(Options::new(StyleSheet::new())).unwrap();

    assert_eq!(
        c.compile("display=flex md-up:hidden", None).unwrap(),
        vec![
            emitted("xs-up", r#"[class*="display=flex"]{display:flex;min-width:0;}"#),
            emitted("md-up", r#"@media (min-width: 768px) {[class*="md-up:hidden"]{display:none;}}"#),
        ]
    );
}

#[test]
fn builtin_rtl_negates_translation() {
    let mut c = Compiler::new();
    let mut opts = Options::new(StyleSheet::new());
    opts.rtl = true;
    c.init(opts).unwrap();

    let out = c.compile("transform=nudge", None).unwrap();
    assert_eq!(out, vec![emitted("xs-up", r#"[class*="transform=nudge"]{transform:translateX(-8px);}"#)]);
}
