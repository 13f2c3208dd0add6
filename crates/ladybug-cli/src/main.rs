#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ladybug: bug, team, and bounty dashboard",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Show the summary dashboard",
        after_help = "EXAMPLES:\n    # Human-readable dashboard\n    lb dashboard\n\n    # Emit machine-readable output\n    lb dashboard --json"
    )]
    Dashboard(cmd::dashboard::DashboardArgs),

    #[command(
        about = "Track bugs: list, create, update, delete",
        after_help = "EXAMPLES:\n    # List open high-severity bugs\n    lb bugs list --status new --severity high\n\n    # Report a bug\n    lb bugs create --title \"Login loop\" --description \"...\" --bucket 3\n\n    # Resolve a bug\n    lb bugs update 2 --status resolved"
    )]
    Bugs {
        #[command(subcommand)]
        command: cmd::bugs::BugsCommand,
    },

    #[command(
        about = "Manage teams and their members",
        after_help = "EXAMPLES:\n    # List teams\n    lb teams list\n\n    # Add a member\n    lb teams add-member --team 1 --name \"Jamie Smith\" --designation \"Senior QA\""
    )]
    Teams {
        #[command(subcommand)]
        command: cmd::teams::TeamsCommand,
    },

    #[command(
        about = "Manage bug buckets",
        after_help = "EXAMPLES:\n    # Add a bucket owned by two teams\n    lb buckets add --name Performance --team 1 --team 2"
    )]
    Buckets {
        #[command(subcommand)]
        command: cmd::buckets::BucketsCommand,
    },

    #[command(
        about = "Track bounties and reward history",
        after_help = "EXAMPLES:\n    # List sprint bounties\n    lb bounties list --cadence sprint\n\n    # Add a bounty\n    lb bounties add --title \"Zero flaky tests\" --deadline 2023-04-28 --target 100 --reward 500"
    )]
    Bounties {
        #[command(subcommand)]
        command: cmd::bounties::BountiesCommand,
    },

    #[command(
        about = "Show trends, distributions, and summary metrics",
        after_help = "EXAMPLES:\n    # Twelve-week trend\n    lb report --weeks 12 --json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        about = "Export selected data to a file",
        after_help = "EXAMPLES:\n    # Everything as CSV into the current directory\n    lb export\n\n    # Bugs only, as JSON, into /tmp\n    lb export --sections bugs --format json --output /tmp"
    )]
    Export(cmd::export::ExportArgs),

    #[command(about = "Open the full-screen dashboard UI")]
    Tui,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LADYBUG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            // Failures the handler already rendered exit quietly; anything
            // else gets the full error chain.
            if err.downcast_ref::<output::Reported>().is_none() {
                eprintln!("error: {err:#}");
            }
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ladybug_core::config::load_project_config(&std::env::current_dir()?)?;
    let user = ladybug_core::config::load_user_config().unwrap_or_default();
    let mode: OutputMode = output::resolve_output_mode(cli.json, user.output.as_deref());

    // All state is in-memory, seeded with the sample dataset, and dropped
    // when the process exits.
    let mut state = ladybug_core::seed::sample();
    tracing::debug!(
        bugs = state.bugs.len(),
        teams = state.teams.len(),
        "seeded in-memory state"
    );

    match &cli.command {
        Commands::Dashboard(args) => cmd::dashboard::run(args, mode, &state, &config),
        Commands::Bugs { command } => cmd::bugs::run(command, mode, &mut state),
        Commands::Teams { command } => cmd::teams::run(command, mode, &mut state),
        Commands::Buckets { command } => cmd::buckets::run(command, mode, &mut state),
        Commands::Bounties { command } => cmd::bounties::run(command, mode, &mut state),
        Commands::Report(args) => cmd::report::run(args, mode, &state, &config),
        Commands::Export(args) => cmd::export::run(args, mode, &state),
        Commands::Tui => tui::run(state, &config),
    }
}
