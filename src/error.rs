//! # Errors
//!
//! Typed failure taxonomy for the frontier pipeline. Every stage surfaces
//! its failure to the caller immediately; a non-converged or degenerate
//! optimizer result is never reported as a valid allocation.

use thiserror::Error;

/// Failures raised by the frontier pipeline.
#[derive(Debug, Error)]
pub enum FrontierError {
  /// Missing, insufficient or malformed price/return data.
  #[error("market data error: {0}")]
  Data(String),

  /// A non-empty sample batch was required.
  #[error("at least one scored portfolio is required")]
  EmptyInput,

  /// The per-asset cap cannot reach full investment for this basket size.
  #[error("infeasible constraints: {assets} assets with weight cap {cap} cannot sum to 1")]
  InfeasibleConstraints {
    /// Number of instruments in the basket.
    assets: usize,
    /// Per-asset upper bound on the allocation weight.
    cap: f64,
  },

  /// The constrained solver did not reach a feasible optimum.
  #[error("solver did not converge: {message}")]
  Convergence {
    /// Solver diagnostic for the caller.
    message: String,
    /// Last iterate, mapped back to allocation weights.
    last_weights: Vec<f64>,
  },

  /// A zero-volatility portfolio where a risk-adjusted ratio is required.
  #[error("degenerate solution: portfolio volatility is zero, ratio undefined")]
  DegenerateSolution,
}
