//! Schema Form CLI
//!
//! Renders a JSON Schema into an HTML form using a template mapping.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use schema_forms::{FormConfig, FormConverter, FormError, IdStrategy, OutputTarget, UnresolvedPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-form")]
#[command(about = "Render a JSON Schema into an HTML form")]
struct Cli {
    /// JSON Schema to render
    schema: PathBuf,

    /// Output file ("-" for stdout)
    #[arg(default_value = "-")]
    out: PathBuf,

    /// Mapping file (overrides the configured mapping)
    #[arg(short, long, conflicts_with = "bundled")]
    mapping: Option<PathBuf>,

    /// Bundled mapping name
    #[arg(short, long)]
    bundled: Option<String>,

    /// Insert between marker lines of OUT instead of overwriting it
    #[arg(short, long)]
    insert: bool,

    /// Marker used in insert mode
    #[arg(short, long)]
    tag: Option<String>,

    /// Element identifier source
    #[arg(long, value_enum)]
    ids: Option<IdsArg>,

    /// Deepest schema nesting accepted
    #[arg(long)]
    max_depth: Option<usize>,

    /// Handling of placeholders with no matching variable
    #[arg(long, value_enum)]
    unresolved: Option<UnresolvedArg>,

    /// Config file to load (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdsArg {
    Random,
    Counter,
}

impl From<IdsArg> for IdStrategy {
    fn from(arg: IdsArg) -> Self {
        match arg {
            IdsArg::Random => IdStrategy::Random,
            IdsArg::Counter => IdStrategy::Counter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum UnresolvedArg {
    Keep,
    Empty,
    Error,
}

impl From<UnresolvedArg> for UnresolvedPolicy {
    fn from(arg: UnresolvedArg) -> Self {
        match arg {
            UnresolvedArg::Keep => UnresolvedPolicy::Keep,
            UnresolvedArg::Empty => UnresolvedPolicy::Empty,
            UnresolvedArg::Error => UnresolvedPolicy::Error,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-q
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        let level = match (cli.quiet, cli.verbose) {
            (true, _) => "off",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        };
        EnvFilter::new(level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error ({}): {}", e.family(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), FormError> {
    let mut config = FormConfig::load_from(cli.config.as_deref())?;

    if let Some(path) = cli.mapping {
        config.mapping.path = Some(path);
    }
    if let Some(name) = cli.bundled {
        config.mapping.path = None;
        config.mapping.bundled = name;
    }
    if let Some(tag) = cli.tag {
        config.output.tag = tag;
    }
    if cli.insert {
        config.output.insert = true;
    }
    if let Some(ids) = cli.ids {
        config.render.ids = ids.into();
    }
    if let Some(max_depth) = cli.max_depth {
        config.render.max_depth = max_depth;
    }
    if let Some(unresolved) = cli.unresolved {
        config.render.unresolved = unresolved.into();
    }

    let converter = FormConverter::from_config(&config)?;
    tracing::info!(
        schema = %cli.schema.display(),
        mapping_types = converter.mapping().len(),
        "rendering form"
    );

    let target = OutputTarget::from_args(&cli.out, config.output.insert, &config.output.tag);
    let conversion = converter.convert_file(&cli.schema, &target)?;

    if target != OutputTarget::Stdout {
        println!("✅ Wrote form to {}", cli.out.display());
        let warnings = conversion.diagnostics.warning_count();
        if warnings > 0 {
            println!("⚠️  {} warning(s):", warnings);
            for warning in conversion.diagnostics.warnings() {
                println!("   └─ {}", warning);
            }
        }
    }

    Ok(())
}
