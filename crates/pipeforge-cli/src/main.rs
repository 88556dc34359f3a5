mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::{init::InitArgs, SelectionArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pipeforge",
    about = "Scaffold CI/CD workflows, deploy scripts and container files into a project",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory with .git/, else the current directory)
    #[arg(long, global = true, env = "PIPEFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log each file as it is written
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate workflows, scripts and container files in the project
    Init(InitArgs),

    /// Show which files a run would generate and the steps each workflow keeps
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List supported stacks and their defaults
    Stacks,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init(args) => cmd::init::run(&root, args, cli.json),
        Commands::Plan { selection } => cmd::plan::run(&root, &selection, cli.json),
        Commands::Stacks => cmd::stacks::run(cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
