//! # Report
//!
//! Console output of the optimized allocation: one row per instrument at
//! fixed 4-decimal precision, followed by the portfolio's expected return
//! and volatility.

use prettytable::Table;
use prettytable::row;

use crate::error::FrontierError;
use crate::portfolio::types::OptimizedPortfolio;

/// Tabulate optimized weights per ticker. The ticker list and the weight
/// vector must be the same length; a partial table is never printed.
pub fn weights_table(
  tickers: &[String],
  optimized: &OptimizedPortfolio,
) -> Result<Table, FrontierError> {
  if tickers.len() != optimized.weights.len() {
    return Err(FrontierError::Data(format!(
      "{} tickers for {} optimized weights",
      tickers.len(),
      optimized.weights.len()
    )));
  }

  let mut table = Table::new();
  table.add_row(row!["Ticker", "Weight"]);
  for (ticker, weight) in tickers.iter().zip(optimized.weights.iter()) {
    table.add_row(row![ticker, format!("{weight:.4}")]);
  }
  Ok(table)
}

/// Render the full report as a string.
pub fn render_report(
  tickers: &[String],
  optimized: &OptimizedPortfolio,
) -> Result<String, FrontierError> {
  Ok(format!(
    "Optimized Portfolio Weights:\n{}Expected Return: {:.4}\nExpected Volatility: {:.4}\n",
    weights_table(tickers, optimized)?,
    optimized.expected_return,
    optimized.volatility
  ))
}

/// Print the report to stdout.
pub fn print_report(
  tickers: &[String],
  optimized: &OptimizedPortfolio,
) -> Result<(), FrontierError> {
  print!("{}", render_report(tickers, optimized)?);
  Ok(())
}
