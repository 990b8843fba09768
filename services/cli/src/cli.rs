use crate::commands::{analysis, backups, edits, scenarios};
use crate::context::AppContext;
use clap::{Args, Parser, Subcommand};
use scorecard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "scorecard",
    about = "Score decision options against weighted criteria from the command line",
    version
)]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Actor recorded in audit events (defaults to APP_ACTOR)
    #[arg(long, global = true)]
    actor: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a scenario from a title and option names
    Create(scenarios::CreateArgs),
    /// List stored scenarios, most recently modified first
    List,
    /// Show progress, leaderboard and gap to the winner
    Show(ScenarioRef),
    /// Rate one option against one criterion (1-5)
    Score(edits::ScoreArgs),
    /// Attach a rationale to a score
    Rationale(edits::RationaleArgs),
    /// Change a criterion weight (weights must be unlocked)
    Weight(edits::WeightArgs),
    /// Lock the criterion weights
    Lock(ScenarioRef),
    /// Unlock the criterion weights, recording why
    Unlock(edits::UnlockArgs),
    /// Per-criterion weighted contributions for selected options
    Compare(analysis::CompareArgs),
    /// Re-rank after scaling one criterion weight by a percentage
    Sensitivity(analysis::SensitivityArgs),
    /// Audit trail, optionally filtered by event type or actor
    History(analysis::HistoryArgs),
    /// List backups of a scenario, newest first
    Backups(ScenarioRef),
    /// Replace a scenario with the contents of one of its backups
    Restore(backups::RestoreArgs),
    /// Delete all but the newest backups of a scenario
    Prune(backups::PruneArgs),
    /// SHA-256 integrity hash of a stored scenario
    Hash(ScenarioRef),
    /// Delete a stored scenario
    Delete(ScenarioRef),
}

#[derive(Args, Debug)]
pub(crate) struct ScenarioRef {
    /// Scenario id
    pub(crate) id: String,
}

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub(crate) json: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut context = AppContext::init()?;
    if let Some(actor) = cli.actor {
        context.actor = actor;
    }
    let output = Output { json: cli.json };

    match cli.command {
        Command::Create(args) => scenarios::create(&context, args, output),
        Command::List => scenarios::list(&context, output),
        Command::Show(target) => scenarios::show(&context, &target.id, output),
        Command::Score(args) => edits::score(&context, args, output),
        Command::Rationale(args) => edits::rationale(&context, args, output),
        Command::Weight(args) => edits::weight(&context, args, output),
        Command::Lock(target) => edits::lock(&context, &target.id, output),
        Command::Unlock(args) => edits::unlock(&context, args, output),
        Command::Compare(args) => analysis::compare(&context, args, output),
        Command::Sensitivity(args) => analysis::sensitivity(&context, args, output),
        Command::History(args) => analysis::history(&context, args, output),
        Command::Backups(target) => backups::list(&context, &target.id, output),
        Command::Restore(args) => backups::restore(&context, args, output),
        Command::Prune(args) => backups::prune(&context, args, output),
        Command::Hash(target) => scenarios::hash(&context, &target.id, output),
        Command::Delete(target) => scenarios::delete(&context, &target.id, output),
    }
}
