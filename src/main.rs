use std::env;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::NaiveDate;
use ndarray::Array2;

use efficient_frontier::market::PriceTable;
use efficient_frontier::portfolio::FrontierEngine;
use efficient_frontier::portfolio::FrontierEngineConfig;
use efficient_frontier::report;
use efficient_frontier::visualization::FrontierChart;

fn main() -> Result<()> {
  let path = env::args()
    .nth(1)
    .unwrap_or_else(|| "./data/closes.csv".to_string());
  let prices = read_price_csv(&path)?;

  println!(
    "Loaded {} periods of closes for {} instruments from {}",
    prices.n_periods(),
    prices.n_assets(),
    path
  );

  let engine = FrontierEngine::new(FrontierEngineConfig::default());
  let analysis = engine.analyze(&prices)?;

  report::print_report(&analysis.tickers, &analysis.optimized)?;

  let out = "efficient_frontier.html";
  FrontierChart::new()
    .title("1000 Portfolio Simulations")
    .write_html(&analysis.samples, &analysis.extremes, out);
  println!("Frontier chart written to {out}");

  Ok(())
}

/// Parse a close-price CSV of the form `date,TICKER1,TICKER2,...` with one
/// ISO date plus one close per instrument on each following line.
fn read_price_csv(path: &str) -> Result<PriceTable> {
  let file = File::open(path).with_context(|| format!("open {path}"))?;
  let reader = BufReader::new(file);
  let mut lines = reader.lines();

  let header = lines.next().context("empty price file")??;
  let mut columns = header.split(',').map(str::trim);
  match columns.next() {
    Some("date") => {}
    _ => bail!("first header column must be 'date'"),
  }
  let tickers: Vec<String> = columns.map(str::to_string).collect();

  let mut dates = Vec::new();
  let mut closes = Vec::new();
  for line in lines {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }
    let mut fields = line.split(',').map(str::trim);
    let date_field = fields.next().context("missing date field")?;
    dates.push(NaiveDate::parse_from_str(date_field, "%Y-%m-%d")?);
    for ticker in &tickers {
      let field = fields
        .next()
        .with_context(|| format!("missing close for {ticker} on {date_field}"))?;
      closes.push(
        field
          .parse::<f64>()
          .with_context(|| format!("close for {ticker} on {date_field}"))?,
      );
    }
  }

  let matrix = Array2::from_shape_vec((dates.len(), tickers.len()), closes)?;
  Ok(PriceTable::new(tickers, dates, matrix)?)
}
