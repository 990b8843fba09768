use clap::Args;
use scorecard::error::AppError;
use serde_json::json;
use tracing::info;

use super::print_json;
use crate::cli::Output;
use crate::context::AppContext;

#[derive(Args, Debug)]
pub(crate) struct RestoreArgs {
    pub(crate) id: String,
    /// Backup filename as printed by `backups`
    pub(crate) filename: String,
}

#[derive(Args, Debug)]
pub(crate) struct PruneArgs {
    pub(crate) id: String,
    /// Number of newest backups to keep (defaults to APP_BACKUP_RETENTION)
    #[arg(long)]
    pub(crate) keep: Option<usize>,
}

pub(crate) fn list(context: &AppContext, id: &str, output: Output) -> Result<(), AppError> {
    let backups = context.store.list_backups(id)?;
    if output.json {
        return print_json(&backups);
    }
    if backups.is_empty() {
        println!("No backups for {id}");
    }
    for backup in &backups {
        println!("{}  {}", backup.created.format("%Y-%m-%d %H:%M:%S"), backup.filename);
    }
    Ok(())
}

/// Load the backup, then save it as the current version. With backups
/// enabled the version being replaced is itself backed up first.
pub(crate) fn restore(context: &AppContext, args: RestoreArgs, output: Output) -> Result<(), AppError> {
    let restored = context.store.restore_from_backup(&args.id, &args.filename)?;
    let backup = context.store.save(&restored)?;
    info!(scenario = %args.id, backup = %args.filename, "scenario restored from backup");

    if output.json {
        return print_json(&restored);
    }
    println!("Restored {} from {}", args.id, args.filename);
    if let Some(backup) = backup {
        println!("Replaced version kept as {}", backup.filename);
    }
    Ok(())
}

pub(crate) fn prune(context: &AppContext, args: PruneArgs, output: Output) -> Result<(), AppError> {
    let keep = args
        .keep
        .unwrap_or(context.store.options().backup_retention);
    let removed = context.store.cleanup_old_backups(&args.id, keep)?;
    if output.json {
        return print_json(&json!({ "id": args.id, "kept": keep, "removed": removed }));
    }
    println!("Removed {removed} backup(s) of {}, kept up to {keep}", args.id);
    Ok(())
}
