//! Outplan CLI - dependency order for indented outlines

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use outplan::error::{FixSuggestion, OutplanError, Result};
use outplan::output::{self, OutputFormat};
use outplan::{Outline, OutplanConfig, Plan};

#[derive(Parser)]
#[command(name = "outplan")]
#[command(about = "Outplan - dependency order for indented outlines")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Columns a tab counts for when reading indentation
    #[arg(long, global = true)]
    tab_width: Option<usize>,

    /// Fail on dependencies that name unknown items
    #[arg(long, global = true)]
    strict: bool,

    /// Config file (default: ~/.config/outplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every item after everything it depends on
    Plan {
        /// Outline file ('-' for stdin)
        file: String,
    },

    /// Print items grouped by dependency level
    Levels {
        /// Outline file ('-' for stdin)
        file: String,
    },

    /// Print each item's dependencies
    Deps {
        /// Outline file ('-' for stdin)
        file: String,

        /// Show direct (parent) dependencies instead of the closure
        #[arg(long)]
        direct: bool,
    },

    /// Print the parsed outline
    Tree {
        /// Outline file ('-' for stdin)
        file: String,
    },

    /// Parse and plan an outline, report counts only
    Check {
        /// Outline file ('-' for stdin)
        file: String,
    },
}

fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<OutplanConfig> {
    let mut config = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(OutplanError::ConfigError {
                reason: format!("Config file not found: {}", path.display()),
            })
        }
        Some(path) => OutplanConfig::load_from(path)?,
        None => OutplanConfig::load()?,
    }
    .with_env()?;

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(tab_width) = cli.tab_width {
        config.tab_width = tab_width;
    }
    if cli.strict {
        config.strict = true;
    }
    config.validate()
}

fn read_outline(file: &str, config: &OutplanConfig) -> Result<Outline> {
    let text = if file == "-" {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(file)?
    };
    config.parser().parse(&text)
}

fn plan_file(file: &str, config: &OutplanConfig) -> Result<Plan> {
    let outline = read_outline(file, config)?;
    let plan = config.planner().plan(&outline)?;
    for diagnostic in &plan.diagnostics {
        eprintln!("{} {}", "Warning:".yellow().bold(), diagnostic);
    }
    Ok(plan)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let format = config.format;

    let rendered = match &cli.command {
        Commands::Plan { file } => output::render_order(&plan_file(file, &config)?.order, format)?,
        Commands::Levels { file } => {
            output::render_levels(&plan_file(file, &config)?.levels, format)?
        }
        Commands::Deps { file, direct } => {
            let plan = plan_file(file, &config)?;
            let graph = if *direct { &plan.direct } else { &plan.graph };
            output::render_graph(graph, format)?
        }
        Commands::Tree { file } => output::render_tree(&read_outline(file, &config)?, format)?,
        Commands::Check { file } => return check(file, &config),
    };

    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

fn check(file: &str, config: &OutplanConfig) -> Result<()> {
    let plan = plan_file(file, config)?;

    println!("{} Outline '{}' is valid", "✓".green(), file);
    println!("  Items: {}", plan.order.len());
    println!("  Direct dependencies: {}", plan.direct.edge_count());
    println!("  Levels: {}", plan.levels.len());
    if !plan.diagnostics.is_empty() {
        println!("  Warnings: {}", plan.diagnostics.len());
    }

    Ok(())
}
