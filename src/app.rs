//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, RunOverrides};
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// A terminal oscilloscope-style sweeping real-time graph
#[derive(Parser)]
#[command(name = "sweepscope")]
#[command(version)]
#[command(about = "Sweeping real-time multi-channel graph for the terminal")]
#[command(
    long_about = "Streams multi-channel sample data into a fixed time window, oscilloscope\n\
style: traces sweep left to right, wrap at the window's end, and keep a short\n\
blank gap ahead of the newest samples.\n\n\
DEFAULT COMMAND:\n    If no command is specified, 'run' is used by default.\n    Run options (--channels, --sample-rate, ...) can be used without explicitly saying 'run'.\n\n\
EXAMPLES:\n    # Stream the demo channels\n    $ sweepscope\n\n    # 16 channels at 500 Hz over a 10 second window\n    $ sweepscope --channels 16 --sample-rate 500 --time-view 10000\n\n    # Edit configuration file\n    $ sweepscope config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/sweepscope/sweepscope.toml\n    Logs:               ~/.local/state/sweepscope/sweepscope.log.*"
)]
struct Cli {
    /// Number of channels to stream (run default command)
    #[arg(long, global = true)]
    channels: Option<usize>,

    /// Samples per second per channel (run default command)
    #[arg(long, global = true)]
    sample_rate: Option<u32>,

    /// Visible time window in milliseconds (run default command)
    #[arg(long, value_name = "MS", global = true)]
    time_view: Option<u32>,

    /// Seed for the demo waveform amplitudes (run default command)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream demo channels into the sweeping graph (default)
    ///
    /// Press Space to pause/resume, 'q' or Escape to quit. SIGUSR1 toggles
    /// pause from outside the terminal.
    #[command(visible_alias = "r")]
    Run {
        /// Number of channels to stream
        #[arg(long)]
        channels: Option<usize>,

        /// Samples per second per channel
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Visible time window in milliseconds
        #[arg(long, value_name = "MS")]
        time_view: Option<u32>,

        /// Seed for the demo waveform amplitudes
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Edit window, stream, and display settings. Uses $EDITOR or falls
    /// back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   sweepscope completions bash > sweepscope.bash
    ///   sweepscope completions zsh > _sweepscope
    ///   sweepscope completions fish > sweepscope.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "sweepscope", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Run { .. }) => {
            // Default command is run
            // Merge top-level options with explicit run command options
            // If both are specified, the explicit run command options take precedence
            let overrides = match cli.command {
                Some(Commands::Run {
                    channels,
                    sample_rate,
                    time_view,
                    seed,
                }) => RunOverrides {
                    channels: channels.or(cli.channels),
                    sample_rate: sample_rate.or(cli.sample_rate),
                    time_view_ms: time_view.or(cli.time_view),
                    seed: seed.or(cli.seed),
                },
                None => RunOverrides {
                    channels: cli.channels,
                    sample_rate: cli.sample_rate,
                    time_view_ms: cli.time_view,
                    seed: cli.seed,
                },
                _ => unreachable!(),
            };
            commands::handle_run(overrides).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
