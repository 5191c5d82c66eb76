use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and:
/// - Creates an initial `config.json` file using `sheet_url` along with default settings
/// - Moves `secret_file` into its default location in the data dir.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
/// - `secret_file` - The downloaded OAuth 2.0 client credentials JSON. This will be moved from the
///   `secret_file` path to its default location and name in the data directory.
/// - `sheet_url` - The URL of the Google Sheet where the expenses are logged.
///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
/// - `who` - The default payer for new expenses.
///
/// # Errors
/// - Returns an error if the URL is invalid or if any file operations fail.
pub async fn init(
    home: &Path,
    secret_file: &Path,
    sheet_url: &str,
    who: Option<String>,
) -> Result<Out<()>> {
    let config = Config::create(home, secret_file, sheet_url, who)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the expenses directory and config at {}",
        config.root().display()
    )
    .into())
}
