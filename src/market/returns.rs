//! # Return Estimation
//!
//! Simple per-period returns from a close-price table. The first observed
//! price has no predecessor, so the return series is one row shorter than
//! the price table.

use ndarray::Array2;

use crate::error::FrontierError;
use crate::market::prices::PriceTable;

/// Per-period simple returns, column-aligned to the source price table.
#[derive(Clone, Debug)]
pub struct ReturnSeries {
  tickers: Vec<String>,
  values: Array2<f64>,
}

impl ReturnSeries {
  /// Ordered instrument identifiers, identical to the source table's.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Return matrix, rows = periods, columns = instruments.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  /// Number of return periods.
  pub fn n_periods(&self) -> usize {
    self.values.nrows()
  }

  /// Number of instruments.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }
}

/// Derive the simple-return series `(p[t] - p[t-1]) / p[t-1]` from a price
/// table, dropping the undefined first row. Column association is preserved;
/// no reordering happens here.
pub fn simple_returns(prices: &PriceTable) -> Result<ReturnSeries, FrontierError> {
  let rows = prices.n_periods();
  if rows < 2 {
    return Err(FrontierError::Data(format!(
      "need at least 2 price rows to compute returns, got {rows}"
    )));
  }

  let closes = prices.closes();
  let mut values = Array2::<f64>::zeros((rows - 1, prices.n_assets()));
  for t in 1..rows {
    for a in 0..prices.n_assets() {
      let prev = closes[[t - 1, a]];
      values[[t - 1, a]] = (closes[[t, a]] - prev) / prev;
    }
  }

  Ok(ReturnSeries {
    tickers: prices.tickers().to_vec(),
    values,
  })
}
