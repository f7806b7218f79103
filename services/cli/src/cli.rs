use crate::demo::{run_badges, run_demo, run_score, BadgesArgs, DemoArgs, ScoreArgs};
use candidate_compat::config::AppConfig;
use candidate_compat::error::AppError;
use candidate_compat::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "candidate-compat",
    about = "Evaluate badge qualification and requisition compatibility for candidates",
    version
)]
struct Cli {
    /// Log per-candidate engine decisions at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the badges a candidate currently qualifies for
    Badges(BadgesArgs),
    /// Score a candidate against a requisition's requirements
    Score(ScoreArgs),
    /// Run the built-in badge catalog against a sample candidate (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, cli.verbose)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Badges(args) => run_badges(&config, args),
        Command::Score(args) => run_score(&config, args),
        Command::Demo(args) => run_demo(&config, args),
    }
}
