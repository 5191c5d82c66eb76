//! The `add` command, which logs one expense and reports the refreshed month summary.

use crate::api::RowStore;
use crate::args::AddArgs;
use crate::commands::report::summary_message;
use crate::commands::{fetch, open, Out, NOT_AUTHENTICATED};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{MonthYear, NewRecord};
use crate::report::{self, MonthSummary};
use crate::{Config, Mode, Result};
use anyhow::{anyhow, Context};
use tracing::{debug, warn};

/// Appends an expense to the sheet.
///
/// `who` falls back to the payer in the config. The amount, type, date and payer are required and
/// the amount must not be negative. When any of these checks fail the write is refused with a
/// `Validation` error before the spreadsheet is contacted.
///
/// On success the records are fetched again and the summary of the current month is returned. Once
/// the row is in the sheet the command succeeds, even if that summary cannot be computed.
pub async fn add(config: &Config, mode: Mode, args: AddArgs) -> Result<Out<MonthSummary>> {
    let record = validate(config, args)?;

    let Some(mut store) = open(config, mode).await? else {
        return Ok(Out::new_message(NOT_AUTHENTICATED));
    };
    append(store.as_mut(), &record).await
}

async fn append(store: &mut dyn RowStore, record: &NewRecord) -> Result<Out<MonthSummary>> {
    store
        .append_record(record)
        .await
        .context("Unable to add the expense")
        .pub_result(ErrorType::Store)?;
    debug!(
        "Added {} for {} on {}",
        record.amount, record.r#type, record.date
    );
    let added = format!(
        "Added {} for {} on {}.",
        record.amount.pretty(),
        record.r#type,
        record.date
    );

    let records = match fetch(store).await {
        Ok(records) => records,
        Err(e) => {
            warn!("The expense was added but the month summary is unavailable: {e}");
            return Ok(Out::new_message(added));
        }
    };
    let summary = report::month_summary(&records, &MonthYear::current());
    let message = format!("{added} {}", summary_message(&summary));
    Ok(Out::new(message, summary))
}

/// Checks the fields of `args` and builds the record that will be written.
fn validate(config: &Config, args: AddArgs) -> Result<NewRecord> {
    let AddArgs {
        amount,
        r#type,
        date,
        who,
        detail,
    } = args;
    let r#type = r#type.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    let who = who
        .or_else(|| config.who().map(String::from))
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty());

    let mut missing = Vec::new();
    if amount.is_none() {
        missing.push("amount");
    }
    if r#type.is_none() {
        missing.push("type");
    }
    if date.is_none() {
        missing.push("date");
    }
    if who.is_none() {
        missing.push("who");
    }

    match (amount, r#type, date, who) {
        (Some(amount), Some(r#type), Some(date), Some(who)) => {
            if amount.is_negative() {
                return Err(invalid(format!("The amount {amount} is negative")));
            }
            Ok(NewRecord {
                date,
                who,
                amount,
                r#type,
                detail: detail.map(|d| d.trim().to_string()).unwrap_or_default(),
            })
        }
        _ => Err(invalid(format!(
            "Cannot add the expense, missing: {}",
            missing.join(", ")
        ))),
    }
}

fn invalid(message: String) -> Error {
    Error::new(ErrorType::Validation, anyhow!(message))
}
