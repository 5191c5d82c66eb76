//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and contains the URL of the
//! Google Sheet that holds the expense log, the name of the tab within it, the default payer and
//! expense types, and authentication file paths.

use crate::error::{ErrorType, IntoResult, Res};
use crate::Result;
use crate::utils;
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CLIENT_SECRET_JSON: &str = "client_secret.json";
const TOKEN_JSON: &str = "token.json";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_SHEET_TITLE: &str = "Bills";
const DEFAULT_TYPES: [&str; 6] = ["Food", "Transport", "Home", "Health", "Leisure", "Other"];

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory, its subdirectories and:
    /// - Creates an initial `config.json` file using `sheet_url` along with default settings
    /// - Moves `secret_file` into its default location in the data dir.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
    /// - `secret_file` - The downloaded OAuth 2.0 client credentials JSON. This will be moved from
    ///   the `secret_file` path to its default location and name in the data directory.
    /// - `sheet_url` - The URL of the Google Sheet where the expenses are logged.
    ///   e.g. https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    /// - `who` - The name that new expenses are logged under when none is given.
    ///
    /// # Errors
    /// - Returns an error if the URL is not a Google Sheets URL or if any file operations fail.
    pub(crate) async fn create(
        dir: impl Into<PathBuf>,
        secret_file: &Path,
        sheet_url: &str,
        who: Option<String>,
    ) -> Res<Self> {
        // Fail before touching the file system
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets_dir = root.join(SECRETS);
        utils::make_dir(&secrets_dir).await?;

        // Move the Google OAuth client credentials file to its default location in the data dir
        let secret_destination = secrets_dir.join(CLIENT_SECRET_JSON);
        utils::rename(secret_file, secret_destination).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            sheet_url: sheet_url.to_string(),
            who,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets: secrets_dir,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that `home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        Self::read(home.into()).await.pub_result(ErrorType::Config)
    }

    async fn read(maybe_relative: PathBuf) -> Res<Self> {
        if !maybe_relative.is_dir() {
            bail!(
                "The expenses home directory is missing '{}', run 'expenses init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?;

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The name of the tab that holds the expense log.
    pub fn sheet_title(&self) -> &str {
        &self.config_file.sheet_title
    }

    /// The payer used when `add` is not given one.
    pub fn who(&self) -> Option<&str> {
        self.config_file.who.as_deref()
    }

    /// Types offered in addition to the ones already found in the sheet.
    pub fn default_types(&self) -> &[String] {
        &self.config_file.default_types
    }

    /// Returns the stored `client_secret_path` if it is absolute, otherwise resolves the relative path.
    pub fn client_secret_path(&self) -> PathBuf {
        self.resolve_path(self.config_file.client_secret_path())
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves the relative path.
    pub fn token_path(&self) -> PathBuf {
        self.resolve_path(self.config_file.token_path())
    }

    fn resolve_path(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "sheet_title": "Bills",
///   "who": "Ana",
///   "default_types": ["Food", "Transport", "Home", "Health", "Leisure", "Other"],
///   "client_secret_path": ".secrets/client_secret.json",
///   "token_path": ".secrets/token.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the Google Sheet
    sheet_url: String,

    /// The tab within the Google Sheet that holds the expense log
    #[serde(default = "default_sheet_title")]
    sheet_title: String,

    /// Default payer for new expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    who: Option<String>,

    #[serde(default = "default_types")]
    default_types: Vec<String>,

    /// Path to the OAuth 2.0 client credentials file (optional, relative to config.json or absolute)
    /// Defaults to $EXPENSES_HOME/.secrets/client_secret.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret_path: Option<PathBuf>,

    /// Path to the OAuth token file (optional, relative to config.json or absolute)
    /// Defaults to $EXPENSES_HOME/.secrets/token.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,
}

fn default_sheet_title() -> String {
    DEFAULT_SHEET_TITLE.to_string()
}

fn default_types() -> Vec<String> {
    DEFAULT_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            sheet_title: default_sheet_title(),
            who: None,
            default_types: default_types(),
            client_secret_path: None,
            token_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    async fn load(path: &Path) -> Res<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;
        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            !config.sheet_title.trim().is_empty(),
            "The sheet_title in the config file is empty"
        );
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: &Path) -> Res<()> {
        utils::save_json(path, self, false)
            .await
            .context("Unable to write config file")
    }

    /// If the path is relative, it is interpreted as relative to the config.json file.
    fn client_secret_path(&self) -> PathBuf {
        self.client_secret_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(CLIENT_SECRET_JSON))
    }

    /// If the path is relative, it is interpreted as relative to the config.json file.
    fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(TOKEN_JSON))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL such as
/// `https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/edit#gid=0`.
fn extract_spreadsheet_id(sheet_url: &str) -> Res<String> {
    let url = Url::parse(sheet_url).with_context(|| format!("'{sheet_url}' is not a URL"))?;
    let mut segments = url
        .path_segments()
        .with_context(|| format!("'{sheet_url}' has no path"))?;
    while let Some(segment) = segments.next() {
        if segment == "d" {
            if let Some(id) = segments.next().filter(|id| !id.is_empty()) {
                return Ok(id.to_string());
            }
        }
    }
    bail!(
        "Invalid Google Sheets URL format. Expected: \
        https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str =
        "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit";

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("expenses_home");
        let secret_source_file = dir.path().join("x.txt");
        let secret_content = "12345";
        utils::write(&secret_source_file, secret_content)
            .await
            .unwrap();

        let config = Config::create(&home_dir, &secret_source_file, URL, Some("Ana".into()))
            .await
            .unwrap();

        assert_eq!(URL, config.sheet_url());
        assert_eq!(
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
            config.spreadsheet_id()
        );
        assert_eq!(config.sheet_title(), "Bills");
        assert_eq!(config.who(), Some("Ana"));
        assert_eq!(config.default_types().len(), 6);

        let found_secret_content = utils::read(&config.client_secret_path()).await.unwrap();
        assert_eq!(secret_content, found_secret_content);
        assert!(!secret_source_file.exists());
        assert!(config.secrets().is_dir());
        assert_eq!(config.token_path(), config.secrets().join(TOKEN_JSON));
    }

    #[tokio::test]
    async fn test_config_create_bad_url() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("expenses_home");
        let secret = dir.path().join("x.txt");
        utils::write(&secret, "{}").await.unwrap();
        let result = Config::create(&home_dir, &secret, "not a url", None).await;
        assert!(result.is_err());
        assert!(!home_dir.exists());
        assert!(secret.is_file());
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let secret = dir.path().join("foo.json");
        utils::write(&secret, "{}").await.unwrap();
        let home = dir.path().join("home");
        let created = Config::create(&home, &secret, URL, None).await.unwrap();

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(created.spreadsheet_id(), loaded.spreadsheet_id());
        assert_eq!(created.root(), loaded.root());
        assert_eq!(loaded.who(), None);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("expenses init"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "expenses",
            "config_version": 1,
            "sheet_url": "https://docs.google.com/spreadsheets/d/minimal"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(config.sheet_title, "Bills");
        assert_eq!(config.default_types, default_types());
        assert_eq!(
            config.client_secret_path(),
            PathBuf::from(SECRETS).join(CLIENT_SECRET_JSON)
        );
        assert_eq!(config.token_path(), PathBuf::from(SECRETS).join(TOKEN_JSON));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "budget",
            "config_version": 1,
            "sheet_url": "https://docs.google.com/spreadsheets/d/test"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let t = TempDir::new().unwrap();
        let path = t.path().join("file.json");
        let original = ConfigFile {
            sheet_url: URL.to_string(),
            sheet_title: "Gastos".to_string(),
            who: Some("Bo".to_string()),
            default_types: vec!["Food".to_string()],
            token_path: Some(PathBuf::from("/tmp/token.json")),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let read = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, read);
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("client_secret_path"));
        assert!(!json.contains("token_path"));
        assert!(!json.contains("who"));
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        let id = extract_spreadsheet_id(URL).unwrap();
        assert_eq!(id, "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL");

        let url = "https://docs.google.com/spreadsheets/d/ABC123?foo=bar#gid=0";
        assert_eq!(extract_spreadsheet_id(url).unwrap(), "ABC123");

        assert!(extract_spreadsheet_id("https://example.com/invalid").is_err());
        assert!(extract_spreadsheet_id("https://example.com/d/").is_err());
        assert!(extract_spreadsheet_id("").is_err());
    }
}
