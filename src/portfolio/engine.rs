//! # Frontier Engine
//!
//! $$
//! P \to r \to (\mu, \Sigma) \to \{\text{sample}, \text{select}\},\ \{\text{optimize}\}
//! $$
//!
//! Orchestration of the full pipeline as explicit function composition.
//! Prices and moments flow by value between stages; the seeded RNG is the
//! only source of nondeterminism.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::FrontierError;
use crate::market::prices::PriceTable;
use crate::market::returns::simple_returns;
use crate::portfolio::moments::Moments;
use crate::portfolio::optimizer::OptimizerConfig;
use crate::portfolio::optimizer::maximize_sharpe;
use crate::portfolio::sampling::DEFAULT_SAMPLE_COUNT;
use crate::portfolio::sampling::sample_portfolios;
use crate::portfolio::sampling::select_extremes;
use crate::portfolio::types::FrontierExtremes;
use crate::portfolio::types::OptimizedPortfolio;
use crate::portfolio::types::ScoredPortfolio;

/// Runtime configuration for [`FrontierEngine`].
#[derive(Clone, Debug)]
pub struct FrontierEngineConfig {
  /// Number of random portfolios in the frontier approximation.
  pub sample_count: usize,
  /// Risk-free rate used by the optimizer's objective.
  pub risk_free: f64,
  /// Per-asset upper bound passed to the optimizer.
  pub weight_cap: f64,
  /// RNG seed for reproducible sampling; entropy-seeded when `None`.
  pub seed: Option<u64>,
}

impl Default for FrontierEngineConfig {
  fn default() -> Self {
    Self {
      sample_count: DEFAULT_SAMPLE_COUNT,
      risk_free: 0.02,
      weight_cap: 0.40,
      seed: None,
    }
  }
}

/// Everything the pipeline derives from one price table.
#[derive(Clone, Debug)]
pub struct FrontierAnalysis {
  /// Instrument order all weight vectors are aligned to.
  pub tickers: Vec<String>,
  /// Scored random portfolios in generation order.
  pub samples: Vec<ScoredPortfolio>,
  /// Max-ratio and min-volatility picks from the batch.
  pub extremes: FrontierExtremes,
  /// Constrained Sharpe-optimal allocation.
  pub optimized: OptimizedPortfolio,
}

/// Single entry point composing returns, moments, sampling, selection and
/// the constrained optimization.
#[derive(Clone, Debug)]
pub struct FrontierEngine {
  config: FrontierEngineConfig,
}

impl FrontierEngine {
  /// Construct an engine with explicit configuration.
  pub fn new(config: FrontierEngineConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &FrontierEngineConfig {
    &self.config
  }

  /// Run the full pipeline on a price table. The sampler branch and the
  /// optimizer branch both consume the same moments; any stage failure
  /// propagates immediately.
  pub fn analyze(&self, prices: &PriceTable) -> Result<FrontierAnalysis, FrontierError> {
    let returns = simple_returns(prices)?;
    let moments = Moments::from_returns(&returns)?;
    debug!(
      assets = moments.n_assets(),
      periods = returns.n_periods(),
      "derived return moments"
    );

    let mut rng = match self.config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let samples = sample_portfolios(&moments, self.config.sample_count, &mut rng);
    let extremes = select_extremes(&samples)?;

    let optimized = maximize_sharpe(
      &moments,
      &OptimizerConfig {
        risk_free: self.config.risk_free,
        weight_cap: self.config.weight_cap,
        ..OptimizerConfig::default()
      },
    )?;

    Ok(FrontierAnalysis {
      tickers: prices.tickers().to_vec(),
      samples,
      extremes,
      optimized,
    })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use chrono::NaiveDate;
  use ndarray::array;

  use super::*;

  fn fixture_prices() -> PriceTable {
    let dates = (0..4)
      .map(|i| NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap())
      .collect();
    PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      dates,
      array![[100.0, 50.0], [110.0, 52.0], [105.0, 55.0], [115.0, 53.0]],
    )
    .unwrap()
  }

  #[test]
  fn end_to_end_with_a_feasible_cap() {
    let engine = FrontierEngine::new(FrontierEngineConfig {
      sample_count: 10,
      risk_free: 0.02,
      weight_cap: 0.60,
      seed: Some(42),
    });

    let analysis = engine.analyze(&fixture_prices()).unwrap();

    assert_eq!(analysis.tickers, vec!["AAA".to_string(), "BBB".to_string()]);
    assert_eq!(analysis.samples.len(), 10);
    for s in &analysis.samples {
      assert_abs_diff_eq!(s.weights.sum(), 1.0, epsilon = 1e-9);
    }

    assert_abs_diff_eq!(analysis.optimized.weights.sum(), 1.0, epsilon = 1e-6);
    for &w in analysis.optimized.weights.iter() {
      assert!(w >= -1e-9);
      assert!(w <= 0.60 + 1e-4);
    }
    assert!(analysis.optimized.volatility > 0.0);
  }

  #[test]
  fn default_cap_is_infeasible_for_two_assets() {
    let engine = FrontierEngine::new(FrontierEngineConfig {
      sample_count: 10,
      seed: Some(42),
      ..FrontierEngineConfig::default()
    });

    assert!(matches!(
      engine.analyze(&fixture_prices()),
      Err(FrontierError::InfeasibleConstraints { assets: 2, .. })
    ));
  }

  #[test]
  fn seeded_runs_are_reproducible() {
    let engine = FrontierEngine::new(FrontierEngineConfig {
      sample_count: 25,
      weight_cap: 0.60,
      seed: Some(7),
      ..FrontierEngineConfig::default()
    });

    let a = engine.analyze(&fixture_prices()).unwrap();
    let b = engine.analyze(&fixture_prices()).unwrap();
    for (x, y) in a.samples.iter().zip(b.samples.iter()) {
      assert_eq!(x.weights, y.weights);
    }
  }
}
