//! # Price Table
//!
//! Time-ordered closing prices for an ordered instrument basket. Column
//! order is significant: every downstream weight vector, mean vector and
//! covariance row/column is positionally aligned to it.

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::FrontierError;

/// Immutable table of closing prices, one row per trading period and one
/// column per instrument.
#[derive(Clone, Debug)]
pub struct PriceTable {
  tickers: Vec<String>,
  dates: Vec<NaiveDate>,
  closes: Array2<f64>,
}

impl PriceTable {
  /// Build a validated price table.
  ///
  /// Rejects duplicate tickers, shape mismatches between tickers, dates and
  /// the close matrix, and any non-finite or non-positive price.
  pub fn new(
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    closes: Array2<f64>,
  ) -> Result<Self, FrontierError> {
    if tickers.is_empty() {
      return Err(FrontierError::Data("instrument set is empty".into()));
    }

    for (i, t) in tickers.iter().enumerate() {
      if tickers[..i].contains(t) {
        return Err(FrontierError::Data(format!("duplicate ticker: {t}")));
      }
    }

    if closes.ncols() != tickers.len() {
      return Err(FrontierError::Data(format!(
        "close matrix has {} columns for {} tickers",
        closes.ncols(),
        tickers.len()
      )));
    }

    if closes.nrows() != dates.len() {
      return Err(FrontierError::Data(format!(
        "close matrix has {} rows for {} dates",
        closes.nrows(),
        dates.len()
      )));
    }

    for (idx, &p) in closes.indexed_iter() {
      if !p.is_finite() || p <= 0.0 {
        return Err(FrontierError::Data(format!(
          "invalid close {p} for {} on {}",
          tickers[idx.1], dates[idx.0]
        )));
      }
    }

    Ok(Self {
      tickers,
      dates,
      closes,
    })
  }

  /// Ordered instrument identifiers.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Trading dates, one per row.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Close matrix, rows = periods, columns = instruments.
  pub fn closes(&self) -> &Array2<f64> {
    &self.closes
  }

  /// Number of trading periods.
  pub fn n_periods(&self) -> usize {
    self.closes.nrows()
  }

  /// Number of instruments.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Reorder columns to match `requested`, failing if any requested
  /// instrument is absent from the table.
  pub fn select(&self, requested: &[String]) -> Result<PriceTable, FrontierError> {
    let mut indices = Vec::with_capacity(requested.len());
    for t in requested {
      let idx = self
        .tickers
        .iter()
        .position(|existing| existing == t)
        .ok_or_else(|| FrontierError::Data(format!("ticker {t} absent from price table")))?;
      indices.push(idx);
    }

    let closes = self.closes.select(Axis(1), &indices);
    PriceTable::new(requested.to_vec(), self.dates.clone(), closes)
  }
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
  }

  #[test]
  fn rejects_nonpositive_prices() {
    let res = PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      vec![date(2), date(3)],
      array![[100.0, 50.0], [110.0, -1.0]],
    );
    assert!(matches!(res, Err(FrontierError::Data(_))));
  }

  #[test]
  fn rejects_duplicate_tickers() {
    let res = PriceTable::new(
      vec!["AAA".into(), "AAA".into()],
      vec![date(2)],
      array![[100.0, 50.0]],
    );
    assert!(matches!(res, Err(FrontierError::Data(_))));
  }

  #[test]
  fn select_reorders_columns_and_flags_missing() {
    let table = PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      vec![date(2), date(3)],
      array![[100.0, 50.0], [110.0, 52.0]],
    )
    .unwrap();

    let reordered = table.select(&["BBB".into(), "AAA".into()]).unwrap();
    assert_eq!(reordered.tickers(), &["BBB".to_string(), "AAA".to_string()]);
    assert_eq!(reordered.closes()[[0, 0]], 50.0);
    assert_eq!(reordered.closes()[[1, 1]], 110.0);

    let missing = table.select(&["CCC".into()]);
    assert!(matches!(missing, Err(FrontierError::Data(_))));
  }
}
