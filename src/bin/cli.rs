use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmsfinder::config::Config;
use cmsfinder::error::FinderError;
use cmsfinder::output::OutputFormat;
use cmsfinder::{Catalog, ScanOptions};

#[derive(Parser)]
#[command(
    name = "cmsfinder",
    about = "Identify installed web applications and their versions from file signatures",
    version,
    author
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect products installed in a directory
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Signature catalog (JSON file or directory of JSON files)
        #[arg(long, short = 's', env = "CMSFINDER_CATALOG")]
        catalog: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the signatures in a catalog
    List {
        /// Signature catalog (JSON file or directory of JSON files)
        #[arg(long, short = 's', env = "CMSFINDER_CATALOG")]
        catalog: PathBuf,

        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .cmsfinder.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Scan {
            path,
            catalog,
            config,
            format,
            output,
        } => cmd_scan(path, catalog, config, format, output),
        Commands::List { catalog, format } => cmd_list(catalog, format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_scan(
    path: PathBuf,
    catalog: PathBuf,
    config: Option<PathBuf>,
    format_str: String,
    output_path: Option<PathBuf>,
) -> Result<i32, FinderError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let options = ScanOptions {
        config_path: config,
    };

    let report = cmsfinder::scan(&catalog, &path, &options)?;
    let rendered = cmsfinder::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(0)
}

fn cmd_list(catalog_path: PathBuf, format_str: String) -> Result<i32, FinderError> {
    let catalog = Catalog::load(&catalog_path)?;
    let entries = catalog.describe();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{}", json);
        }
        _ => {
            println!(
                "{:<28} {:<6} {:<6} {:<24} END-OF-LIFE",
                "NAME", "FP", "VER", "SUPPORTS"
            );
            println!("{}", "-".repeat(80));
            for entry in &entries {
                println!(
                    "{:<28} {:<6} {:<6} {:<24} {}",
                    entry.name,
                    entry.fingerprints,
                    entry.version_rules,
                    join_or_dash(&entry.supports),
                    join_or_dash(&entry.lasts),
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, FinderError> {
    let path = PathBuf::from(".cmsfinder.toml");

    if path.exists() && !force {
        eprintln!(".cmsfinder.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .cmsfinder.toml");

    Ok(0)
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".into()
    } else {
        values.join(",")
    }
}
