// =================================================================
// backtest/types.rs - Simulation Parameters, Results and Errors
// =================================================================

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::PriceField;

/// Decimal places used for every monetary field in a `DailyResult`
pub const DISPLAY_SCALE: u32 = 2;

/// What to do with a bar whose open or close is not strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPricePolicy {
    /// Abort the run with `SimulationError::InvalidPrice`
    #[default]
    Fail,
    /// Leave the day out and carry cash and shares to the next day
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_amount: Decimal,
    #[serde(default)]
    pub invalid_price_policy: InvalidPricePolicy,
}

impl SimulationParams {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        initial_amount: Decimal,
    ) -> Result<Self, SimulationError> {
        let params = Self {
            start_date,
            end_date,
            initial_amount,
            invalid_price_policy: InvalidPricePolicy::default(),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_invalid_price_policy(mut self, policy: InvalidPricePolicy) -> Self {
        self.invalid_price_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.initial_amount <= Decimal::ZERO {
            return Err(SimulationError::InvalidParameters(format!(
                "initial amount must be positive, got {}",
                self.initial_amount
            )));
        }

        if self.start_date > self.end_date {
            return Err(SimulationError::InvalidParameters(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }

        Ok(())
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }
}

/// One simulated trading day. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    pub date: NaiveDate,
    pub open_price: Decimal,
    pub close_price: Decimal,
    /// Whole shares held after the morning buy
    pub shares: u64,
    pub investment: Decimal,
    pub end_value: Decimal,
    pub daily_profit: Decimal,
    /// Cash left uninvested after the morning buy
    pub available_funds: Decimal,
    pub total_value: Decimal,
    pub cumulative_profit: Decimal,
}

/// Round half away from zero and pin the scale, so `120` renders as `120.00`
pub fn to_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid {field} price {value} on {date}")]
    InvalidPrice {
        date: NaiveDate,
        field: PriceField,
        value: Decimal,
    },

    #[error("Arithmetic overflow while trading {date}")]
    Overflow { date: NaiveDate },
}

/// Aggregate figures over a finished simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub trading_days: usize,
    pub initial_amount: Decimal,
    pub final_value: Decimal,
    pub total_profit: Decimal,
    pub return_percentage: Decimal,
    pub winning_days: u32,
    pub losing_days: u32,
    pub flat_days: u32,
    pub best_day: Option<NaiveDate>,
    pub worst_day: Option<NaiveDate>,
    /// Largest peak-to-trough fall of `total_value`, in percent
    pub max_drawdown: Decimal,
}
