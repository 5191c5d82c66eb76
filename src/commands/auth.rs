//! The `expenses auth` command, which checks that we can use the spreadsheet.
//!
//! The first OAuth token is obtained outside of this program and placed at the configured token
//! path. This command never opens a browser.

use crate::api::TokenProvider;
use crate::commands::{fetch, open, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Mode, Result};
use anyhow::Context;
use tracing::info;

/// Verifies authentication by refreshing the OAuth token and reading the expense log.
///
/// If the token is missing, invalid, or has the wrong scopes, this fails with a `Config` error
/// telling the user where the token is expected. In test mode there is no token and only the
/// read is done.
///
/// Returns the number of records found in the sheet.
pub async fn auth_verify(config: &Config, mode: Mode) -> Result<Out<usize>> {
    if mode == Mode::Google {
        let mut token_provider =
            TokenProvider::load(config.client_secret_path(), config.token_path())
                .await
                .with_context(|| {
                    format!(
                        "Unable to use the OAuth files. The client secret is expected at {} and \
                        the token at {}",
                        config.client_secret_path().display(),
                        config.token_path().display()
                    )
                })
                .pub_result(ErrorType::Config)?;
        token_provider
            .refresh()
            .await
            .context("Unable to refresh the token")
            .pub_result(ErrorType::Store)?;
        info!("Your OAuth token is valid!");
    }

    let Some(mut store) = open(config, mode).await? else {
        return Err(crate::Error::new(
            ErrorType::Config,
            anyhow::anyhow!(
                "No OAuth token found at {}",
                config.token_path().display()
            ),
        ));
    };
    let records = fetch(store.as_mut()).await?;
    Ok(Out::new(
        format!(
            "Found {} expenses in the '{}' tab",
            records.len(),
            config.sheet_title()
        ),
        records.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_auth_verify_test_mode() {
        let env = TestEnv::new().await;
        let out = auth_verify(&env.config(), Mode::Test).await.unwrap();
        assert_eq!(out.structure(), Some(&10));
        assert_eq!(out.message(), "Found 10 expenses in the 'Bills' tab");
    }

    #[tokio::test]
    async fn test_auth_verify_without_token() {
        let env = TestEnv::new().await;
        let err = auth_verify(&env.config(), Mode::Google).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("token.json"));
    }
}
