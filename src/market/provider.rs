//! # Price Data Collaborator
//!
//! The core never fetches data itself. Implementations return a
//! time-ordered close table for exactly the requested instruments or fail.

use chrono::NaiveDate;

use crate::error::FrontierError;
use crate::market::prices::PriceTable;

/// Source of historical closing prices for an ordered instrument basket.
pub trait ClosePriceProvider {
  /// Fetch closing prices for exactly `tickers` over `[start, end]`,
  /// column-ordered as requested. Fails if any instrument is unknown or the
  /// range holds no data.
  fn closing_prices(
    &self,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<PriceTable, FrontierError>;
}
