pub(crate) mod analysis;
pub(crate) mod backups;
pub(crate) mod edits;
pub(crate) mod scenarios;

use scorecard::error::AppError;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}
