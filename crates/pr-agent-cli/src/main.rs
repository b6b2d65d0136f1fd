mod cmd;
mod output;
mod root;
mod tools;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use pr_agent_core::config::Config;
use std::path::PathBuf;
use tools::ToolRegistry;

#[derive(Parser)]
#[command(
    name = "pr-agent",
    about = "MCP tool server for PR descriptions, CI status, and team notifications",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .pr-agent/ or .git/)
    #[arg(long, global = true, env = "PR_AGENT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP stdio server
    Serve,

    /// Create .pr-agent/config.yaml and the default PR templates
    Init,

    /// List the tools the server exposes
    Tools,

    /// Call one tool directly and print its result
    Call {
        /// Tool name, e.g. analyze_file_changes
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Append a webhook event (JSON object) to the event log
    Ingest {
        /// Read the event from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries protocol messages in `serve`, so logs always go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = root::resolve_root(cli.root.as_deref());
    let json = cli.json;
    let load = || Config::load_with_env(&root).context("failed to load config");

    match cli.command {
        Commands::Serve => cmd::mcp::run(&ToolRegistry::from_config(&root, &load()?)),
        Commands::Init => cmd::init::run(&root, &load()?),
        Commands::Tools => cmd::tool::list(&ToolRegistry::from_config(&root, &load()?), json),
        Commands::Call { name, args } => cmd::tool::call(
            &ToolRegistry::from_config(&root, &load()?),
            &name,
            args.as_deref(),
            json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, json),
        Commands::Ingest { file } => cmd::ingest::run(&root, &load()?, file.as_deref(), json),
    }
}
