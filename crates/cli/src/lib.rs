pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::recommend::Strategy;

#[derive(Debug, Parser)]
#[command(
    name = "vitarec",
    about = "Vitarec operator CLI",
    long_about = "Operate Vitarec migrations, demo fixtures, readiness checks, and one-shot recommendations.",
    after_help = "Examples:\n  vitarec doctor --json\n  vitarec seed\n  vitarec recommend --user-id user-demo-001 --strategy weighted"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog, rule set, and demo survey profile")]
    Seed,
    #[command(about = "Compute recommendations for a user with the chosen strategy")]
    Recommend {
        #[arg(long, help = "User whose survey profile drives the recommendation")]
        user_id: String,
        #[arg(long, value_enum, default_value = "deterministic")]
        strategy: Strategy,
        #[arg(long, help = "Cap the number of returned recommendations")]
        max: Option<usize>,
    },
    #[command(about = "Validate configuration and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Recommend { user_id, strategy, max } => {
            commands::recommend::run(&user_id, strategy, max)
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
