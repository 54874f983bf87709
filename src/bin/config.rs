//! Schema Form Config CLI
//!
//! View and manage form rendering configuration.

use clap::{Parser, Subcommand};
use schema_forms::{FormConfig, FormConverter, MappingRepository};

#[derive(Parser)]
#[command(name = "schema-form-config")]
#[command(about = "View and manage form rendering configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: schema-forms.toml)
        #[arg(short, long, default_value = "schema-forms.toml")]
        output: String,
    },

    /// Validate configuration and the mapping it selects
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },

    /// List mappings bundled with the binary
    Mappings,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = FormConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Schema Form Configuration\n");
                println!("Mapping:");
                match &cfg.mapping.path {
                    Some(path) => println!("  Path: {}", path.display()),
                    None => println!("  Bundled: {}", cfg.mapping.bundled),
                }

                println!("\nOutput:");
                println!("  Insert: {}", cfg.output.insert);
                println!("  Tag: {}", cfg.output.tag);

                println!("\nRender:");
                println!("  Ids: {:?}", cfg.render.ids);
                println!("  Id length: {}", cfg.render.id_length);
                println!("  Max depth: {}", cfg.render.max_depth);
                println!("  Unresolved: {:?}", cfg.render.unresolved);
            }
        }

        Commands::Init { output } => {
            let cfg = FormConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => {
            let cfg = match FormConfig::load_from(config.as_deref()) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    std::process::exit(1);
                }
            };
            match FormConverter::from_config(&cfg) {
                Ok(converter) => {
                    println!("✅ Configuration is valid");
                    println!("   Mapping types: {}", converter.mapping().len());
                    println!("   Max depth: {}", cfg.render.max_depth);
                }
                Err(e) => {
                    eprintln!("❌ Mapping error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Mappings => {
            println!("📦 Bundled mappings:");
            for name in MappingRepository::bundled_names() {
                println!("  - {}", name);
            }
        }
    }

    Ok(())
}
