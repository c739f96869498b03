//! CSV export of simulation results.
//!
//! Columns follow the field order of [`DailyResult`]; every value is a date,
//! an integer or a fixed two-decimal number, so no field ever needs quoting.

use std::io::Write;

use thiserror::Error;

use crate::backtest::DailyResult;

pub const DAILY_RESULT_CSV_HEADER: [&str; 10] = [
    "date",
    "openPrice",
    "closePrice",
    "shares",
    "investment",
    "endValue",
    "dailyProfit",
    "availableFunds",
    "totalValue",
    "cumulativeProfit",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write a header row followed by one row per day; an empty slice still gets the header
pub fn write_csv<W: Write>(writer: W, results: &[DailyResult]) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(DAILY_RESULT_CSV_HEADER)?;
    for day in results {
        wtr.serialize(day)?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn to_csv_string(results: &[DailyResult]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, results)?;
    Ok(String::from_utf8(buffer)?)
}
