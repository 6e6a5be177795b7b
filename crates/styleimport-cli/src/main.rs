use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use styleimport_css::{loader, Stylesheet};
use styleimport_engine::{literal, resolve, FormatChoice, MatcherSpec};

#[derive(Parser)]
#[command(name = "styleimport")]
#[command(about = "Resolve CSS rules into literal strings or objects at build time")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a matcher against a stylesheet and print the literal
    #[command(group(
        ArgGroup::new("matcher")
            .required(true)
            .args(["selector", "list", "regex", "map"]),
    ))]
    Resolve {
        /// Stylesheet specifier: absolute, `./relative`, or a package path
        stylesheet: String,

        /// Source file the import appears in; relative specifiers start from its directory
        #[arg(long)]
        from: Option<PathBuf>,

        /// Exact selector
        #[arg(long)]
        selector: Option<String>,

        /// Exact selectors, one result per selector
        #[arg(long, num_args = 1..)]
        list: Option<Vec<String>>,

        /// Regular expression tested against every selector
        #[arg(long)]
        regex: Option<String>,

        /// Regular expression flags (`g` returns every matching rule)
        #[arg(long, requires = "regex")]
        flags: Option<String>,

        /// KEY=SELECTOR entries, one result per key
        #[arg(long, num_args = 1.., value_parser = parse_map_entry)]
        map: Option<Vec<(String, String)>>,

        /// Output format of each matched rule
        #[arg(long, conflicts_with = "accessor")]
        format: Option<FormatChoice>,

        /// Import accessor name, as in `styledImport.<accessor>(...)`
        #[arg(long)]
        accessor: Option<String>,

        /// Literal syntax to print
        #[arg(long, value_enum, default_value_t = Emit::Js)]
        emit: Emit,
    },

    /// Parse a stylesheet and list its selectors
    Check {
        /// Stylesheet specifier
        stylesheet: String,

        /// Source file the import appears in
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// JavaScript expression
    Js,
    /// JSON document
    Json,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            stylesheet,
            from,
            selector,
            list,
            regex,
            flags,
            map,
            format,
            accessor,
            emit,
        } => {
            let matcher = match (selector, list, regex, map) {
                (Some(selector), ..) => MatcherSpec::Selector(selector),
                (_, Some(items), ..) => MatcherSpec::List(items),
                (_, _, Some(pattern), _) => MatcherSpec::Pattern {
                    pattern,
                    flags: flags.unwrap_or_default(),
                },
                (.., Some(entries)) => MatcherSpec::Map(entries),
                // clap's `matcher` group requires one of them
                _ => unreachable!("no matcher argument"),
            };
            let format = format.unwrap_or_else(|| FormatChoice::from_accessor(accessor.as_deref()));
            cmd_resolve(&stylesheet, from.as_deref(), &matcher, format, emit);
        }
        Command::Check { stylesheet, from } => cmd_check(&stylesheet, from.as_deref()),
    }
}

/// Install a log subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn parse_map_entry(entry: &str) -> Result<(String, String), String> {
    match entry.split_once('=') {
        Some((key, selector)) if !key.is_empty() => Ok((key.to_owned(), selector.to_owned())),
        _ => Err(format!("expected KEY=SELECTOR, got '{entry}'")),
    }
}

fn load_stylesheet(specifier: &str, from: Option<&Path>) -> Stylesheet {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Error: cannot read current directory: {e}");
            std::process::exit(1);
        }
    };
    let base = from.map_or_else(|| cwd.clone(), |caller| loader::base_dir(caller, &cwd));

    let loaded = loader::resolve_specifier(&base, specifier).and_then(|path| loader::load(&path));
    match loaded {
        Ok(stylesheet) => {
            tracing::debug!(
                source = %stylesheet.source,
                rules = stylesheet.rules.len(),
                "stylesheet loaded"
            );
            stylesheet
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_resolve(
    specifier: &str,
    from: Option<&Path>,
    matcher: &MatcherSpec,
    format: FormatChoice,
    emit: Emit,
) {
    let stylesheet = load_stylesheet(specifier, from);

    let resolution = match resolve(&stylesheet, matcher, format) {
        Ok(resolution) => resolution,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match emit {
        Emit::Js => println!("{}", literal::to_js(&resolution)),
        Emit::Json => match serde_json::to_string_pretty(&resolution) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}

fn cmd_check(specifier: &str, from: Option<&Path>) {
    let stylesheet = load_stylesheet(specifier, from);

    for selector in stylesheet.selectors() {
        println!("{selector}");
    }
    eprintln!(
        "OK: {} ({} rules)",
        stylesheet.source,
        stylesheet.rules.len()
    );
}
