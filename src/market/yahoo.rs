//! # Yahoo Finance Provider
//!
//! [`ClosePriceProvider`] backed by the Yahoo Finance chart API. Rows are
//! restricted to dates on which every requested instrument traded, so the
//! resulting table has no gaps.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono::NaiveTime;
use ndarray::Array2;
use time::OffsetDateTime;
use tokio::runtime::Runtime;
use yahoo_finance_api::YahooConnector;

use crate::error::FrontierError;
use crate::market::prices::PriceTable;
use crate::market::provider::ClosePriceProvider;

/// Blocking Yahoo Finance price source. Owns a current-thread tokio runtime
/// that drives the connector's async requests.
pub struct YahooProvider {
  connector: YahooConnector,
  runtime: Runtime,
}

impl YahooProvider {
  /// Construct a connector-backed provider.
  pub fn new() -> Result<Self, FrontierError> {
    let connector = YahooConnector::new()
      .map_err(|e| FrontierError::Data(format!("yahoo connector: {e}")))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(|e| FrontierError::Data(format!("tokio runtime: {e}")))?;
    Ok(Self { connector, runtime })
  }
}

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime, FrontierError> {
  let secs = date.and_time(NaiveTime::MIN).and_utc().timestamp();
  OffsetDateTime::from_unix_timestamp(secs)
    .map_err(|e| FrontierError::Data(format!("date {date} out of range: {e}")))
}

impl ClosePriceProvider for YahooProvider {
  fn closing_prices(
    &self,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<PriceTable, FrontierError> {
    if tickers.is_empty() {
      return Err(FrontierError::Data("instrument set is empty".into()));
    }

    let start_ts = to_offset(start)?;
    let end_ts = to_offset(end)?;

    // Per-ticker date -> close, keyed for the cross-instrument intersection.
    let mut series: Vec<BTreeMap<NaiveDate, f64>> = Vec::with_capacity(tickers.len());
    for ticker in tickers {
      let response = self
        .runtime
        .block_on(self.connector.get_quote_history(ticker, start_ts, end_ts))
        .map_err(|e| FrontierError::Data(format!("history for {ticker}: {e}")))?;
      let quotes = response
        .quotes()
        .map_err(|e| FrontierError::Data(format!("quotes for {ticker}: {e}")))?;

      let mut by_date = BTreeMap::new();
      for q in quotes {
        if let Some(dt) = chrono::DateTime::from_timestamp(q.timestamp as i64, 0) {
          by_date.insert(dt.date_naive(), q.close);
        }
      }

      if by_date.is_empty() {
        return Err(FrontierError::Data(format!(
          "no quotes for {ticker} between {start} and {end}"
        )));
      }
      series.push(by_date);
    }

    let common: Vec<NaiveDate> = series[0]
      .keys()
      .filter(|d| series.iter().all(|s| s.contains_key(*d)))
      .copied()
      .collect();
    if common.is_empty() {
      return Err(FrontierError::Data(
        "no trading dates shared by all instruments".into(),
      ));
    }

    let mut closes = Array2::<f64>::zeros((common.len(), tickers.len()));
    for (row, date) in common.iter().enumerate() {
      for (col, s) in series.iter().enumerate() {
        closes[[row, col]] = s[date];
      }
    }

    PriceTable::new(tickers.to_vec(), common, closes)
  }
}
