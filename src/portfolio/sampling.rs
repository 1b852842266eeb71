//! # Random Portfolio Sampling
//!
//! $$
//! w_i = \frac{u_i}{\sum_j u_j}, \quad u_j \sim \mathcal U(0,1)
//! $$
//!
//! Monte Carlo approximation of the feasible allocation space: uniform
//! draws normalized onto the simplex, scored by return, volatility and the
//! plain return/volatility ratio, then scanned for the frontier extremes.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use tracing::debug;

use crate::error::FrontierError;
use crate::portfolio::moments::Moments;
use crate::portfolio::moments::portfolio_return;
use crate::portfolio::moments::portfolio_volatility;
use crate::portfolio::types::FrontierExtremes;
use crate::portfolio::types::ScoredPortfolio;

/// Default number of random portfolios per batch.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

fn random_simplex_weights<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
  loop {
    let draws = Array1::random_using(n, Uniform::new(0.0, 1.0), rng);
    let total = draws.sum();
    if total > 1e-12 {
      return draws / total;
    }
  }
}

/// Generate `count` random allocations and score each one. Output order is
/// generation order, so a seeded RNG reproduces the batch exactly.
pub fn sample_portfolios<R: Rng + ?Sized>(
  moments: &Moments,
  count: usize,
  rng: &mut R,
) -> Vec<ScoredPortfolio> {
  let n = moments.n_assets();
  let mut samples = Vec::with_capacity(count);

  for _ in 0..count {
    let weights = random_simplex_weights(n, rng);
    let expected_return = portfolio_return(&weights, moments.mean());
    let volatility = portfolio_volatility(&weights, moments.cov());
    let ratio = if volatility > 0.0 {
      expected_return / volatility
    } else {
      f64::NAN
    };

    samples.push(ScoredPortfolio {
      weights,
      expected_return,
      volatility,
      ratio,
    });
  }

  debug!(count = samples.len(), assets = n, "scored random portfolios");
  samples
}

/// Scan a scored batch for the maximum-ratio and minimum-volatility samples.
/// Ties break toward the first occurrence in generation order; `NaN` ratios
/// are unrankable and skipped.
pub fn select_extremes(samples: &[ScoredPortfolio]) -> Result<FrontierExtremes, FrontierError> {
  if samples.is_empty() {
    return Err(FrontierError::EmptyInput);
  }

  let mut best_ratio: Option<&ScoredPortfolio> = None;
  for s in samples {
    if s.ratio.is_nan() {
      continue;
    }
    match best_ratio {
      Some(current) if s.ratio <= current.ratio => {}
      _ => best_ratio = Some(s),
    }
  }

  // Every sample at zero volatility: there is no rankable ratio to pick.
  let max_ratio = best_ratio.ok_or(FrontierError::DegenerateSolution)?.clone();

  let mut min_volatility = &samples[0];
  for s in &samples[1..] {
    if s.volatility < min_volatility.volatility {
      min_volatility = s;
    }
  }

  Ok(FrontierExtremes {
    max_ratio,
    min_volatility: min_volatility.clone(),
  })
}
