use utilcss::{CompileOutput, StyleSheet};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

/// Everything the CLI prints about one run.
pub struct Report<'a> {
    pub input: &'a str,
    /// Tokens after unification.
    pub tokens: &'a [String],
    pub output: &'a CompileOutput,
    pub sheet: Option<&'a StyleSheet>,
    pub rtl: bool,
}

pub fn print_run(report: &Report<'_>, color: bool) {
    let palette = ansi::Palette::new(color);
    let direction = if report.rtl { " (rtl)" } else { "" };
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Compiling: \"{}\"{direction}", report.input.trim()), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    for (idx, token) in report.tokens.iter().enumerate() {
        println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), palette.paint(token, ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Emitted ━━━", ansi::GRAY));
    if report.output.emitted.is_empty() {
        println!("{}", palette.dim("  No CSS produced"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Utility keys are not registered (check the configuration)");
        println!("  • Values have no entry and the utility has no wildcard template");
        println!("\n{}", palette.dim("  Tip: Set UTILCSS_DEBUG=trace to see skipped tokens"));
    } else {
        for emitted in &report.output.emitted {
            println!("  {}", palette.bold(palette.paint(&emitted.breakpoint, ansi::MAGENTA)));
            println!("    {}", palette.paint(&emitted.css, ansi::GREEN));
        }
    }

    let m = &report.output.metrics;
    println!("\n{}", palette.paint("━━━ Metrics ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Tokens: {}  │  Cached: {}  │  Skipped: {}  │  Deduplicated: {}  │  Breakpoints: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(m.tokens.to_string(), ansi::BLUE),
        palette.paint(m.cached.to_string(), ansi::CYAN),
        palette.dim(m.skipped.to_string()),
        palette.dim(m.deduplicated.to_string()),
        palette.paint(m.rendered.to_string(), ansi::YELLOW),
    );

    if let Some(sheet) = report.sheet {
        println!("\n{}", palette.paint("━━━ Stylesheet ━━━", ansi::GRAY));
        println!("{}", sheet.to_css());
    }
    println!();
}
