mod debug_report;

use std::io::{self, IsTerminal, Read};
use utilcss::{Compiler, Config, Options, StyleSheet, extract_class_tokens, unify_utility_classes};

const DEBUG_ENV: &str = "UTILCSS_DEBUG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    install_tracing();

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), String> {
    let mut options = Options::new(StyleSheet::new());
    options.rtl = config.rtl;
    if let Some(path) = &config.config_path {
        let text = std::fs::read_to_string(path).map_err(|err| format!("failed to read {path}: {err}"))?;
        options.config = Some(Config::from_json(&text).map_err(|err| err.to_string())?);
    }

    let mut compiler = Compiler::new();
    compiler.init(options).map_err(|err| err.to_string())?;

    let tokens =
        if config.html { extract_class_tokens(&config.input) } else { config.input.split_whitespace().map(str::to_string).collect() };
    let output = compiler.compile_verbose(tokens.clone(), None).map_err(|err| err.to_string())?;

    let report = debug_report::Report {
        input: &config.input,
        tokens: &unify_utility_classes(&tokens),
        output: &output,
        sheet: compiler.target(),
        rtl: config.rtl,
    };
    debug_report::print_run(&report, config.color);
    Ok(())
}

/// Log to stderr only when `UTILCSS_DEBUG` is set (`trace` for per-token detail).
fn install_tracing() {
    let Some(level) = std::env::var_os(DEBUG_ENV) else {
        return;
    };
    let level = if level == "trace" { tracing::Level::TRACE } else { tracing::Level::DEBUG };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already installed");
    }
}

struct CliConfig {
    input: String,
    config_path: Option<String>,
    rtl: bool,
    html: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut rtl = false;
    let mut html = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("utilcss {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--rtl" => rtl = true,
            "--html" => html = true,
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --config expects a file path".to_string())?;
                config_path = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--config=") => {
                config_path = Some(arg.trim_start_matches("--config=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, config_path, rtl, html, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "utilcss {version}

Utility-token to CSS compiler CLI.

Usage:
  utilcss [OPTIONS] [--] <tokens...>
  echo '<div class=\"md-up:p=2\">' | utilcss --html

Options:
  -c, --config <file>   JSON configuration overlaid on the built-in one.
  --rtl                 Mirror the registry for right-to-left output.
  --html                Treat input as markup and compile its class attributes.
  --color               Force ANSI color output.
  --no-color            Disable ANSI color output.
  -h, --help            Show this help message.
  -V, --version         Print version information.

Environment:
  {debug_env}=1         Log compile passes to stderr ({debug_env}=trace for per-token detail).

Exit codes:
  0  Success.
  1  Configuration or internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        debug_env = DEBUG_ENV
    )
}
