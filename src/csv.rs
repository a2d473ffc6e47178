use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::{Command, DISPENSE_PRICE, Event, Outcome};

/// Errors that can occur when reading a session or writing its event log
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open session file: {0}")]
    Open(#[source] csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing value")]
    MissingValue { line: usize, action: String },

    #[error("line {line}: invalid amount '{value}'")]
    InvalidAmount { line: usize, value: String },

    #[error("failed to write event row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush event log: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    action: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    event: &'static str,
    item: Option<&'a str>,
    amount: u64,
    credit: u64,
    status: String,
}

/// Read session commands from a csv file
pub fn read_session(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: InputRow) -> Result<Command, CsvError> {
    let value = row.value.filter(|v| !v.is_empty());
    match row.action.as_str() {
        "insert" => {
            let value = value.ok_or_else(|| CsvError::MissingValue {
                line,
                action: row.action.clone(),
            })?;
            let amount = value
                .parse::<u64>()
                .map_err(|_| CsvError::InvalidAmount { line, value })?;
            Ok(Command::Insert { amount })
        }
        "dispense" => {
            let item = value.ok_or_else(|| CsvError::MissingValue {
                line,
                action: row.action.clone(),
            })?;
            Ok(Command::Dispense { item })
        }
        "return" => Ok(Command::ReturnChange),
        other => Err(CsvError::UnrecognizedAction {
            line,
            action: other.to_string(),
        }),
    }
}

/// Write applied outcomes as csv rows
pub fn write_events<'a>(
    outcomes: impl IntoIterator<Item = &'a Outcome>,
    writer: impl io::Write,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let (event, item, amount) = match &outcome.event {
            Event::Inserted(denomination) => ("inserted", None, denomination.value()),
            Event::Dispensed(item) => {
                ("dispensed", Some(item.as_str()), DISPENSE_PRICE.value())
            }
            Event::ChangeReturned(change) => ("change_returned", None, change.value()),
        };
        writer.serialize(OutputRow {
            event,
            item,
            amount,
            credit: outcome.credit.value(),
            status: outcome.status.to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
