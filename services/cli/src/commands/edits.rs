use clap::Args;
use scorecard::error::AppError;
use scorecard::scenario::Scenario;

use super::print_json;
use crate::cli::Output;
use crate::context::AppContext;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    pub(crate) id: String,
    pub(crate) option_id: String,
    pub(crate) criterion_id: String,
    /// Rating from 1 (low anchor) to 5 (high anchor)
    pub(crate) raw: u8,
    /// Optional rationale stored with the score
    #[arg(long)]
    pub(crate) rationale: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RationaleArgs {
    pub(crate) id: String,
    pub(crate) option_id: String,
    pub(crate) criterion_id: String,
    pub(crate) rationale: String,
}

#[derive(Args, Debug)]
pub(crate) struct WeightArgs {
    pub(crate) id: String,
    pub(crate) criterion_id: String,
    #[arg(allow_negative_numbers = true)]
    pub(crate) weight: i64,
    /// Why the weight changed (recorded in the audit trail)
    #[arg(long, default_value = "")]
    pub(crate) reason: String,
}

#[derive(Args, Debug)]
pub(crate) struct UnlockArgs {
    pub(crate) id: String,
    /// Why the weights are being reopened
    #[arg(long)]
    pub(crate) reason: String,
}

pub(crate) fn score(context: &AppContext, args: ScoreArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let updated = context.scoring.set_score(
        &scenario,
        &args.option_id,
        &args.criterion_id,
        args.raw,
        &context.actor,
        args.rationale.as_deref(),
    )?;
    commit(context, &updated, output, || {
        format!(
            "{} scored {} on {}",
            args.option_id, args.raw, args.criterion_id
        )
    })
}

pub(crate) fn rationale(
    context: &AppContext,
    args: RationaleArgs,
    output: Output,
) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let updated = context.scoring.set_rationale(
        &scenario,
        &args.option_id,
        &args.criterion_id,
        &args.rationale,
        &context.actor,
    )?;
    commit(context, &updated, output, || {
        format!("Rationale saved for {} on {}", args.option_id, args.criterion_id)
    })
}

pub(crate) fn weight(context: &AppContext, args: WeightArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let updated = context.weights.set_weight(
        &scenario,
        &args.criterion_id,
        args.weight,
        &context.actor,
        &args.reason,
    )?;
    commit(context, &updated, output, || {
        format!(
            "{} weight set to {} (total weight {})",
            args.criterion_id,
            args.weight,
            context.weights.total_weight(&updated)
        )
    })
}

pub(crate) fn lock(context: &AppContext, id: &str, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(id)?;
    let updated = context.weights.lock(&scenario, &context.actor)?;
    commit(context, &updated, output, || "Weights locked".to_string())
}

pub(crate) fn unlock(context: &AppContext, args: UnlockArgs, output: Output) -> Result<(), AppError> {
    let scenario = context.store.load(&args.id)?;
    let updated = context
        .weights
        .unlock(&scenario, &context.actor, &args.reason)?;
    commit(context, &updated, output, || "Weights unlocked".to_string())
}

fn commit(
    context: &AppContext,
    scenario: &Scenario,
    output: Output,
    message: impl FnOnce() -> String,
) -> Result<(), AppError> {
    let backup = context.store.save(scenario)?;
    if output.json {
        return print_json(scenario);
    }
    println!("{}", message());
    if let Some(backup) = backup {
        println!("Previous version kept as {}", backup.filename);
    }
    Ok(())
}
