use crate::error::AnalyticsError;
use crate::indicators::{compound, pct_change, rolling_mean};
use crate::report::{AugmentedTable, IndicatorRow};
use configuration::IndicatorParams;
use core_types::{PriceTable, UndefinedReason};

/// A stateless calculator that derives the indicator columns from a price table.
///
/// The engine only holds its window sizes, so one instance can be reused for
/// any number of tables and always produces the same output for the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEngine {
    short_window: usize,
    long_window: usize,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        let params = IndicatorParams::default();
        Self {
            short_window: params.sma_short_window,
            long_window: params.sma_long_window,
        }
    }
}

impl IndicatorEngine {
    /// Creates an engine with the given moving-average windows.
    pub fn new(params: IndicatorParams) -> Result<Self, AnalyticsError> {
        for window in [params.sma_short_window, params.sma_long_window] {
            if window == 0 {
                return Err(AnalyticsError::InvalidWindow(window));
            }
        }
        Ok(Self {
            short_window: params.sma_short_window,
            long_window: params.sma_long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// The main entry point for deriving the indicator columns.
    ///
    /// # Arguments
    ///
    /// * `table` - A validated, date-ordered price table. An empty table is fine.
    ///
    /// # Returns
    ///
    /// The `AugmentedTable` with both moving averages, the daily return and the
    /// cumulative return for every row.
    pub fn calculate(&self, table: &PriceTable) -> Result<AugmentedTable, AnalyticsError> {
        let closes = table.closes();

        let sma_short = rolling_mean(&closes, self.short_window)?;
        tracing::debug!(window = self.short_window, "Short SMA computed.");
        let sma_long = rolling_mean(&closes, self.long_window)?;
        tracing::debug!(window = self.long_window, "Long SMA computed.");

        let daily_returns = pct_change(&closes);
        // Compounding reads the return column, never the prices directly.
        let cumulative = compound(&daily_returns);
        tracing::debug!("Daily and cumulative returns computed.");

        let anomalies = daily_returns
            .iter()
            .filter(|c| c.reason() == Some(UndefinedReason::UndefinedRatio))
            .count();
        if anomalies > 0 {
            tracing::warn!(
                anomalies,
                "Non-positive closes found; affected returns and all later cumulative returns are undefined."
            );
        }

        let rows = table
            .iter()
            .zip(sma_short)
            .zip(sma_long)
            .zip(daily_returns)
            .zip(cumulative)
            .map(
                |((((bar, sma_short), sma_long), daily_return), cumulative_return)| IndicatorRow {
                    bar: *bar,
                    sma_short,
                    sma_long,
                    daily_return,
                    cumulative_return,
                },
            )
            .collect();

        Ok(AugmentedTable {
            short_window: self.short_window,
            long_window: self.long_window,
            rows,
        })
    }
}
