// =================================================================
// backtest/simulator.rs - Daily Open-to-Open Profit Simulation
// =================================================================

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::*;
use crate::data::{PriceBar, TimeSeries};

/// Cash and position carried from one trading day to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ledger {
    available_funds: Decimal,
    shares: Decimal,
    cumulative_profit: Decimal,
}

impl Ledger {
    fn new(initial_amount: Decimal) -> Self {
        Self {
            available_funds: initial_amount,
            shares: Decimal::ZERO,
            cumulative_profit: Decimal::ZERO,
        }
    }

    /// Sell everything held at today's open, buy back as many whole shares as
    /// the cash allows at the same open, and mark the position to the close.
    fn trade_day(
        self,
        date: NaiveDate,
        bar: &PriceBar,
    ) -> Result<(Ledger, DailyResult), SimulationError> {
        let overflow = || SimulationError::Overflow { date };

        let proceeds = self.shares.checked_mul(bar.open).ok_or_else(overflow)?;
        let funds = self.available_funds.checked_add(proceeds).ok_or_else(overflow)?;

        let shares = funds.checked_div(bar.open).ok_or_else(overflow)?.floor();
        let investment = shares.checked_mul(bar.open).ok_or_else(overflow)?;
        let available_funds = funds - investment;

        let end_value = shares.checked_mul(bar.close).ok_or_else(overflow)?;
        let daily_profit = end_value - investment;
        let cumulative_profit = self.cumulative_profit + daily_profit;
        let total_value = end_value + available_funds;

        let day = DailyResult {
            date,
            open_price: to_display(bar.open),
            close_price: to_display(bar.close),
            shares: shares.to_u64().ok_or_else(overflow)?,
            investment: to_display(investment),
            end_value: to_display(end_value),
            daily_profit: to_display(daily_profit),
            available_funds: to_display(available_funds),
            total_value: to_display(total_value),
            cumulative_profit: to_display(cumulative_profit),
        };

        let ledger = Ledger {
            available_funds,
            shares,
            cumulative_profit,
        };

        Ok((ledger, day))
    }
}

/// Run the daily churn strategy over every bar in `[start_date, end_date]`.
///
/// The series may be unordered and may extend past the range; days missing
/// from it are simply not traded. Rounding to two decimals happens only on
/// the emitted records, the carried ledger keeps full precision.
pub fn simulate(
    time_series: &TimeSeries,
    params: &SimulationParams,
) -> Result<Vec<DailyResult>, SimulationError> {
    params.validate()?;

    let mut bars: Vec<(&NaiveDate, &PriceBar)> = time_series
        .iter()
        .filter(|(date, _)| params.contains(date))
        .collect();
    bars.sort_by_key(|(date, _)| **date);

    debug!(
        "Simulating {} trading days between {} and {}",
        bars.len(),
        params.start_date,
        params.end_date
    );

    let capacity = bars.len();
    let (_, results) = bars.into_iter().try_fold(
        (Ledger::new(params.initial_amount), Vec::with_capacity(capacity)),
        |(ledger, mut results), (date, bar)| {
            if let Some((field, value)) = bar.invalid_field() {
                match params.invalid_price_policy {
                    InvalidPricePolicy::Fail => {
                        return Err(SimulationError::InvalidPrice {
                            date: *date,
                            field,
                            value,
                        });
                    }
                    InvalidPricePolicy::Skip => {
                        warn!("Skipping {}: invalid {} price {}", date, field, value);
                        return Ok((ledger, results));
                    }
                }
            }

            let (ledger, day) = ledger.trade_day(*date, bar)?;
            results.push(day);
            Ok((ledger, results))
        },
    )?;

    Ok(results)
}
