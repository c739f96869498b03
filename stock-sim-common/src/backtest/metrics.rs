// stock-sim-common/src/backtest/metrics.rs

use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::types::*;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

impl SimulationSummary {
    /// Summarise the emitted series. Works on the two-decimal values a caller
    /// sees, so the figures agree with the table and CSV they accompany.
    pub fn from_results(initial_amount: Decimal, results: &[DailyResult]) -> Self {
        let final_value = results
            .last()
            .map(|day| day.total_value)
            .unwrap_or(initial_amount);
        let total_profit = final_value - initial_amount;

        let (winning_days, losing_days, flat_days) = count_days(results);

        Self {
            trading_days: results.len(),
            initial_amount: to_display(initial_amount),
            final_value: to_display(final_value),
            total_profit: to_display(total_profit),
            return_percentage: to_display(percentage(total_profit, initial_amount)),
            winning_days,
            losing_days,
            flat_days,
            best_day: extreme_day(results, Ordering::Greater),
            worst_day: extreme_day(results, Ordering::Less),
            max_drawdown: to_display(max_drawdown(initial_amount, results)),
        }
    }
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * HUNDRED
    }
}

fn count_days(results: &[DailyResult]) -> (u32, u32, u32) {
    results
        .iter()
        .fold((0, 0, 0), |(win, loss, flat), day| {
            match day.daily_profit.cmp(&Decimal::ZERO) {
                Ordering::Greater => (win + 1, loss, flat),
                Ordering::Less => (win, loss + 1, flat),
                Ordering::Equal => (win, loss, flat + 1),
            }
        })
}

/// First day whose profit compares as `wanted` against every other day
fn extreme_day(results: &[DailyResult], wanted: Ordering) -> Option<chrono::NaiveDate> {
    results
        .iter()
        .fold(None::<&DailyResult>, |best, day| match best {
            Some(current) if day.daily_profit.cmp(&current.daily_profit) != wanted => Some(current),
            _ => Some(day),
        })
        .map(|day| day.date)
}

/// Peak-to-trough decline of total value in percent, the starting cash counting as the first peak
fn max_drawdown(initial_amount: Decimal, results: &[DailyResult]) -> Decimal {
    let mut peak = initial_amount;
    let mut worst = Decimal::ZERO;

    for day in results {
        if day.total_value > peak {
            peak = day.total_value;
        }
        let drawdown = percentage(peak - day.total_value, peak);
        if drawdown > worst {
            worst = drawdown;
        }
    }

    worst
}
