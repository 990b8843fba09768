mod cli;
mod commands;
mod context;

use scorecard::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
