mod commands;
mod loader;
mod view;

use clap::{Parser, Subcommand};
use mibscope_api::{DEFAULT_SEARCH_LIMIT, NodeKind};
use mibscope_core::logging::init_logging;
use mibscope_core::{LoadOutcome, ModuleRegistry};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

pub use commands::{Output, execute};
pub use loader::{collect_paths, load_sources};

#[derive(Parser)]
#[command(
    name = "mibscope",
    version,
    about = "Parse SNMP MIB modules and explore their OID trees",
    long_about = "Mibscope reads SMIv1/SMIv2 MIB modules, resolves every declaration to its \
                  numeric OID (using imports between the loaded modules), and lets you list, \
                  browse and search the result."
)]
pub struct Cli {
    /// MIB files or directories to load
    #[arg(short, long = "path", value_name = "PATH", global = true, default_value = "MIB")]
    pub paths: Vec<PathBuf>,

    /// File extensions to read; files without an extension are always read
    #[arg(long, value_delimiter = ',', global = true, default_values = ["mib", "txt", "my"])]
    pub ext: Vec<String>,

    /// Print log output to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the loaded modules
    Modules,
    /// Print the OID tree of a module, or of every module
    Tree {
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
    /// Show every attribute of a node, looked up by name or dotted OID
    Show {
        #[arg(value_name = "NAME_OR_OID")]
        target: String,
        /// Only look in this module
        #[arg(short, long)]
        module: Option<String>,
    },
    /// Search names, OIDs, syntax and descriptions
    #[command(
        long_about = "Case-insensitive search over every loaded node. Matches the module, name, \
                      numeric and symbolic OID, kind, syntax and description."
    )]
    Search {
        term: String,
        /// Treat the term as a regular expression
        #[arg(short, long)]
        regex: bool,
        /// Only return nodes of this kind (repeatable), e.g. OBJECT-TYPE
        #[arg(short, long, value_parser = parse_kind)]
        kind: Vec<NodeKind>,
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Show import edges between modules
    Imports {
        /// Only show edges from this importer
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
}

/// Accepts the source keyword in any case, with `_` or a space for `-`.
pub fn parse_kind(value: &str) -> Result<NodeKind, String> {
    let wanted = value.trim().to_ascii_uppercase().replace(['_', ' '], "-");
    NodeKind::ALL
        .into_iter()
        .find(|k| k.as_str() == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = NodeKind::ALL.iter().map(|k| k.as_str()).collect();
            format!("unknown kind '{value}', expected one of: {}", known.join(", "))
        })
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging("cli", cli.verbose);

    let sources = load_sources(&cli.paths, &cli.ext);
    let mut registry = ModuleRegistry::new();
    for report in registry.load(sources) {
        if report.outcome == LoadOutcome::NoModuleHeader {
            warn!("{}: no module header found, skipped", report.label);
        }
    }
    info!("Loaded {} modules", registry.len());

    let output = Output {
        json: cli.json,
        color: !cli.json && std::io::stdout().is_terminal(),
    };
    let text = execute(&cli.command, &registry, output)?;
    println!("{}", text.trim_end());
    Ok(())
}
