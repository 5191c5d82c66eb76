//! These structs provide the CLI interface for the expenses CLI.

use crate::model::{parse_year, DateStamp, FormatError, Money, MonthYear};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: log your spending to a Google sheet and see where the money went.
///
/// Every expense is a row in a Google sheet with the columns Date, Who, Amount, Type and Detail.
/// This program appends rows to that sheet and reports monthly and yearly totals, grouped by type
/// or by month.
///
/// You will need a Google OAuth client and a token that can access the sheet. Run `expenses init`
/// first, then place the token at the configured token path and run `expenses auth` to check it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need the URL of your Google sheet and the
    /// OAuth client credentials downloaded from the Google Cloud Console.
    Init(InitArgs),
    /// Check that the OAuth token works by refreshing it and reading the sheet.
    Auth,
    /// Log an expense, then show how this month compares with the last one.
    Add(AddArgs),
    /// List the expense types found in the sheet and the configured defaults.
    Types,
    /// Compare the spending of a month with the month before it.
    Summary(SummaryArgs),
    /// Add up the spending of a month or a year.
    Total(TotalArgs),
    /// Show the spending of a month grouped by type, largest first.
    ByType(MonthArgs),
    /// Show the spending of a year grouped by month.
    ByMonth(YearArgs),
    /// List the years that have expenses.
    Years,
    /// List the months that have expenses.
    MonthYears,
    /// List the expenses of one type in a month.
    Details(DetailsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration and OAuth files are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded OAuth client credentials. This file will be moved to the
    /// default secrets location in the main data directory.
    #[arg(long)]
    client_secret: PathBuf,

    /// Your name, used as the payer when `add` is not given `--who`.
    #[arg(long)]
    who: Option<String>,
}

impl InitArgs {
    pub fn new(
        sheet_url: impl Into<String>,
        client_secret: impl Into<PathBuf>,
        who: Option<String>,
    ) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            client_secret: client_secret.into(),
            who,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn client_secret(&self) -> &Path {
        &self.client_secret
    }

    pub fn who(&self) -> Option<&str> {
        self.who.as_deref()
    }
}

/// Args for the `expenses add` command. Fields are optional here so that the command can tell the
/// user everything that is missing at once.
#[derive(Debug, Default, ClapArgs, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// The amount spent, e.g. 12.50 or $1,200
    #[arg(long)]
    pub amount: Option<Money>,

    /// The type of expense, e.g. Food. See `expenses types`.
    #[arg(long = "type")]
    pub r#type: Option<String>,

    /// The date of the expense as DD/MM/YYYY or YYYY-MM-DD.
    #[arg(long, default_value = "today", value_parser = parse_date)]
    pub date: Option<DateStamp>,

    /// Who paid. Defaults to the `who` in config.json.
    #[arg(long)]
    pub who: Option<String>,

    /// A free-text description.
    #[arg(long)]
    pub detail: Option<String>,
}

/// (Not shown): Args for the `expenses summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The month as MM/YYYY. Defaults to the current month.
    #[arg(long)]
    month: Option<MonthYear>,
}

impl SummaryArgs {
    pub fn month(&self) -> Option<&MonthYear> {
        self.month.as_ref()
    }
}

/// (Not shown): Args for the `expenses total` command.
#[derive(Debug, Parser, Clone)]
#[group(required = true, multiple = false)]
pub struct TotalArgs {
    /// Total a month, given as MM/YYYY.
    #[arg(long)]
    month: Option<MonthYear>,

    /// Total a year, given as YYYY.
    #[arg(long, value_parser = parse_year)]
    year: Option<String>,
}

impl TotalArgs {
    pub fn month(&self) -> Option<&MonthYear> {
        self.month.as_ref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }
}

/// (Not shown): Args for commands that report on one month.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    /// The month as MM/YYYY.
    month: MonthYear,
}

impl MonthArgs {
    pub fn month(&self) -> &MonthYear {
        &self.month
    }
}

/// (Not shown): Args for commands that report on one year.
#[derive(Debug, Parser, Clone)]
pub struct YearArgs {
    /// The year as YYYY.
    #[arg(value_parser = parse_year)]
    year: String,
}

impl YearArgs {
    pub fn year(&self) -> &str {
        &self.year
    }
}

/// (Not shown): Args for the `expenses details` command.
#[derive(Debug, Parser, Clone)]
pub struct DetailsArgs {
    /// The month as MM/YYYY.
    month: MonthYear,

    /// The type of expense, e.g. Food.
    r#type: String,
}

impl DetailsArgs {
    pub fn month(&self) -> &MonthYear {
        &self.month
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }
}

/// Parses a date given on the command line. `today` is accepted as well.
fn parse_date(s: &str) -> Result<DateStamp, FormatError> {
    if s.trim().eq_ignore_ascii_case("today") {
        return Ok(DateStamp::today());
    }
    DateStamp::parse_input(s)
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSES_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut all = vec!["expenses", "--home", "/tmp/expenses"];
        all.extend_from_slice(args);
        Args::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_add_args() {
        let args = parse(&[
            "add", "--amount", "$1,200", "--type", "Home", "--date", "2024-02-03",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.amount, Some("1200".parse().unwrap()));
        assert_eq!(add.r#type.as_deref(), Some("Home"));
        assert_eq!(add.date.as_ref().unwrap().to_string(), "03/02/2024");
        assert_eq!(add.who, None);
        assert_eq!(args.common().home().path(), Path::new("/tmp/expenses"));
    }

    #[test]
    fn test_add_date_defaults_to_today() {
        let args = parse(&["add", "--amount", "3"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.date, Some(DateStamp::today()));
        assert_eq!(add.r#type, None);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let base = ["expenses", "--home", "/tmp/x"];
        let bad: [&[&str]; 4] = [
            &["add", "--amount", "ten"],
            &["add", "--date", "31/13/2024"],
            &["by-month", "24"],
            &["total", "--month", "03/2024", "--year", "2024"],
        ];
        for args in bad {
            let all: Vec<&str> = base.iter().chain(args.iter()).copied().collect();
            assert!(Args::try_parse_from(all).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_report_args() {
        let args = parse(&["details", "03/2025", "Food"]);
        let Command::Details(details) = args.command() else {
            panic!("expected details");
        };
        assert_eq!(details.month(), &MonthYear::new(3, 2025).unwrap());
        assert_eq!(details.r#type(), "Food");

        let args = parse(&["--log-level", "debug", "total", "--year", "2025"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Total(total) = args.command() else {
            panic!("expected total");
        };
        assert_eq!(total.year(), Some("2025"));
        assert_eq!(total.month(), None);
    }
}
