use clap::Args;
use scorecard::error::AppError;

use super::print_json;
use crate::cli::Output;
use crate::context::AppContext;

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    pub(crate) id: String,
    /// Option ids to break down (defaults to every option)
    pub(crate) option_ids: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SensitivityArgs {
    pub(crate) id: String,
    pub(crate) criterion_id: String,
    /// Percentage change applied to the weight, e.g. 20 or -50
    #[arg(allow_negative_numbers = true)]
    pub(crate) pct: f64,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    pub(crate) id: String,
    /// Only events of this type, e.g. score_changed
    #[arg(long = "type")]
    pub(crate) kind: Option<String>,
    /// Only events recorded by this actor
    #[arg(long = "by")]
    pub(crate) by: Option<String>,
}

pub(crate) fn compare(context: &AppContext, args: CompareArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let option_ids: Vec<&str> = if args.option_ids.is_empty() {
        scenario.options.iter().map(|option| option.id.as_str()).collect()
    } else {
        args.option_ids.iter().map(String::as_str).collect()
    };
    let breakdown = context.analysis.contributions(&scenario, &option_ids);

    if output.json {
        return print_json(&breakdown);
    }
    for option in &breakdown.options {
        println!("{} (total {})", option.option_id, option.total);
        for criterion in &breakdown.criteria {
            println!(
                "  {:<28} w{:<3} {:>5}",
                criterion.name,
                criterion.weight,
                option.criterion(&criterion.criterion_id)
            );
        }
    }
    Ok(())
}

pub(crate) fn sensitivity(
    context: &AppContext,
    args: SensitivityArgs,
    output: Output,
) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let report = context
        .analysis
        .sensitivity(&scenario, &args.criterion_id, args.pct)?;

    if output.json {
        return print_json(&report);
    }
    println!(
        "{}: weight {} -> {:.2} ({:+}%)",
        report.criterion_id, report.original_weight, report.adjusted_weight, report.pct
    );
    for (before, after) in report.original.iter().zip(&report.adjusted) {
        println!(
            "{:>2}. {:<24} {:>8.1}   |   {:>2}. {:<24} {:>8.1}",
            before.rank, before.name, before.total, after.rank, after.name, after.total
        );
    }
    if report.winner_changed() {
        println!("Winner changes under this weighting");
    }
    Ok(())
}

pub(crate) fn history(context: &AppContext, args: HistoryArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let events = context
        .audit
        .history(&scenario, args.kind.as_deref(), args.by.as_deref());

    if output.json {
        return print_json(&events);
    }
    if events.is_empty() {
        println!("No matching audit events");
    }
    for event in events {
        println!(
            "{}  {:<16} {:<18} {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.actor,
            event.kind(),
            serde_json::Value::Object(event.details.to_map())
        );
    }
    Ok(())
}
