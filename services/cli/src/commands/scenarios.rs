use clap::Args;
use scorecard::error::AppError;
use serde_json::json;

use super::print_json;
use crate::cli::Output;
use crate::context::AppContext;

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    /// Scenario title
    #[arg(long)]
    pub(crate) title: String,
    /// Option names, in display order
    #[arg(required = true)]
    pub(crate) options: Vec<String>,
}

pub(crate) fn create(context: &AppContext, args: CreateArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.setup.create(&args.title, args.options.as_slice(), None)?;
    context.store.save(&scenario)?;

    if output.json {
        return print_json(&scenario);
    }
    println!("Created scenario {} \"{}\"", scenario.id, scenario.title);
    for option in &scenario.options {
        println!("- {}: {}", option.id, option.name);
    }
    println!("Criteria:");
    for criterion in &scenario.criteria {
        println!("- {} (weight {}): {}", criterion.id, criterion.weight, criterion.name);
    }
    Ok(())
}

pub(crate) fn list(context: &AppContext, output: Output) -> Result<(), AppError> {
    let summaries = context.store.summaries()?;
    if output.json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No scenarios in {}", context.store.paths().base().display());
        return Ok(());
    }
    for summary in &summaries {
        println!(
            "{}  {}  {}{}",
            summary.id,
            summary.modified_at.format("%Y-%m-%d %H:%M"),
            summary.title,
            if summary.weights_locked { " [locked]" } else { "" }
        );
    }
    Ok(())
}

pub(crate) fn show(context: &AppContext, id: &str, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(id)?;
    let progress = context.setup.progress(&scenario);
    let leaderboard = context.analysis.leaderboard(&scenario);
    let deltas = context.analysis.delta_to_winner(&scenario);

    if output.json {
        return print_json(&json!({
            "scenario": scenario,
            "progress": progress,
            "leaderboard": leaderboard,
            "deltaToWinner": deltas,
        }));
    }

    println!("{} ({})", scenario.title, scenario.id);
    println!(
        "Scored {}/{} cells ({:.0}%), weights {}",
        progress.scored_cells,
        progress.total_cells,
        progress.percent_complete,
        if progress.weights_locked { "locked" } else { "unlocked" }
    );
    println!("\nLeaderboard");
    for entry in &leaderboard {
        let delta = deltas.get(&entry.option_id).map_or(0, |d| d.delta);
        println!(
            "{:>2}. {} {:>6} ({:.1}%)  -{}",
            entry.rank, entry.name, entry.total, entry.normalized, delta
        );
    }
    Ok(())
}

pub(crate) fn hash(context: &AppContext, id: &str, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(id)?;
    let digest = context.store.hash(&scenario)?;
    if output.json {
        return print_json(&json!({ "id": id, "sha256": digest }));
    }
    println!("{digest}");
    Ok(())
}

pub(crate) fn delete(context: &AppContext, id: &str, output: Output) -> Result<(), AppError> {
    context.store.delete(id)?;
    if output.json {
        return print_json(&json!({ "deleted": id }));
    }
    println!("Deleted scenario {id}");
    Ok(())
}
