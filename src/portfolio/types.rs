//! # Portfolio Types
//!
//! $$
//! \mathbf{w}^\*=\arg\max_{\mathbf{w}} \frac{\mathbb E[R_p]-r_f}{\sigma_p}
//! $$
//!
//! Result containers shared by the sampler, selector and optimizer.

use ndarray::Array1;

/// A random allocation with its score triple.
#[derive(Clone, Debug)]
pub struct ScoredPortfolio {
  /// Allocation weights; nonnegative, summing to 1.
  pub weights: Array1<f64>,
  /// Expected portfolio return `w · mu`.
  pub expected_return: f64,
  /// Portfolio volatility `sqrt(w' Sigma w)`, always >= 0.
  pub volatility: f64,
  /// Plain `return / volatility`; `NaN` when volatility is 0 and therefore
  /// unrankable. Unlike [`OptimizedPortfolio::sharpe`], the risk-free rate
  /// is NOT subtracted here, matching the original simulation.
  pub ratio: f64,
}

/// The two frontier picks extracted from a scored sample batch.
#[derive(Clone, Debug)]
pub struct FrontierExtremes {
  /// Sample with the maximum ratio (first occurrence wins ties).
  pub max_ratio: ScoredPortfolio,
  /// Sample with the minimum volatility (first occurrence wins ties).
  pub min_volatility: ScoredPortfolio,
}

/// Output of the constrained Sharpe maximization.
#[derive(Clone, Debug)]
pub struct OptimizedPortfolio {
  /// Final allocation weights satisfying all constraints within tolerance.
  pub weights: Array1<f64>,
  /// Expected return recomputed from the final weights.
  pub expected_return: f64,
  /// Volatility recomputed from the final weights.
  pub volatility: f64,
  /// `(expected_return - risk_free) / volatility`.
  pub sharpe: f64,
}
