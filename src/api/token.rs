//! Keeps the OAuth access token fresh.
//!
//! Getting the first token requires the user to go through Google's consent screen, which is done
//! outside of this program. After that, we only need the refresh token to get new access tokens.

use crate::api::files::{load_token, File, SecretFile, TokenFile};
use crate::error::Res;
use anyhow::Context;
use chrono::Utc;
use oauth2::basic::BasicClient;
use oauth2::{ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Google does not always say how long a token lives. This is the documented default.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Provides a valid access token, refreshing it when it has expired.
#[derive(Debug)]
pub(crate) struct TokenProvider {
    secret: File<SecretFile>,
    token: File<TokenFile>,
}

impl TokenProvider {
    /// Loads the client secret and the token files. Fails if either is missing or invalid.
    pub(crate) async fn load(
        client_secret_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Res<Self> {
        let secret = File::load(client_secret_path)
            .await
            .context("Unable to load the OAuth client secret file")?;
        let token_path: PathBuf = token_path.into();
        let token = load_token(&token_path).await?;
        Ok(Self { secret, token })
    }

    /// The current access token, which may have expired.
    pub(crate) fn token(&self) -> &str {
        self.token.data().access_token()
    }

    /// Returns the access token, refreshing it first if it has expired.
    pub(crate) async fn token_with_refresh(&mut self) -> Res<&str> {
        if self.token.data().is_expired() {
            self.refresh().await?;
        }
        Ok(self.token())
    }

    /// Exchanges the refresh token for a new access token and saves it to the token file.
    pub(crate) async fn refresh(&mut self) -> Res<()> {
        debug!("Refreshing the OAuth access token");
        let secret = self.secret.data();
        let client = BasicClient::new(ClientId::new(secret.client_id().to_string()))
            .set_client_secret(ClientSecret::new(secret.client_secret().to_string()))
            .set_token_uri(
                TokenUrl::new(secret.token_uri().to_string())
                    .context("The token_uri in the client secret file is invalid")?,
            );

        let http_client = reqwest::ClientBuilder::new()
            // Following redirects opens the client to SSRF vulnerabilities
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Unable to create the HTTP client")?;

        let refresh_token = RefreshToken::new(self.token.data().refresh_token().to_string());
        let response = client
            .exchange_refresh_token(&refresh_token)
            .request_async(&http_client)
            .await
            .context("Unable to refresh the OAuth access token")?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(lifetime).context("Token lifetime is out of range")?;
        self.token.data_mut().update(
            response.access_token().secret().to_string(),
            expires_at,
            response.refresh_token().map(|t| t.secret().to_string()),
        );
        self.token
            .save()
            .await
            .with_context(|| format!("Unable to save {}", self.token.path().display()))?;
        debug!("The OAuth access token is valid until {expires_at}");
        Ok(())
    }
}
