//! # Constrained Optimizer
//!
//! $$
//! \min_{\mathbf{w}} \ -\frac{\mathbf{w}^\top\mu - r_f}{\sqrt{\mathbf{w}^\top\Sigma\mathbf{w}}}
//! \quad \text{s.t.} \quad \sum_i w_i = 1,\ 0 \le w_i \le c
//! $$
//!
//! Exact (non-sampled) Sharpe maximization over the capped simplex. The
//! solver parameter is an unconstrained vector mapped through softmax, which
//! satisfies the full-investment equality and the [0, 1] bounds by
//! construction; the per-asset cap is enforced with an escalating quadratic
//! penalty and verified on the final iterate.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::TerminationReason;
use argmin::core::TerminationStatus;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use tracing::debug;
use tracing::warn;

use crate::error::FrontierError;
use crate::portfolio::moments::Moments;
use crate::portfolio::moments::portfolio_return;
use crate::portfolio::moments::portfolio_volatility;
use crate::portfolio::types::OptimizedPortfolio;

/// Volatility below this is treated as exactly zero.
const VOL_FLOOR: f64 = 1e-12;
/// Cap violation accepted on the final iterate.
const CAP_TOLERANCE: f64 = 1e-4;
/// Penalty weights applied round by round until the cap holds.
const PENALTY_SCHEDULE: [f64; 3] = [1e2, 1e4, 1e6];

/// Configuration of the constrained Sharpe maximization.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
  /// Risk-free rate subtracted in the objective.
  pub risk_free: f64,
  /// Per-asset upper bound on the allocation weight.
  pub weight_cap: f64,
  /// Starting allocation; equal weights when `None`. Entries must be
  /// strictly positive and one per instrument.
  pub initial_weights: Option<Vec<f64>>,
  /// Iteration budget per penalty round; bounds solver effort.
  pub max_iters: u64,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      risk_free: 0.02,
      weight_cap: 0.40,
      initial_weights: None,
      max_iters: 5000,
    }
  }
}

fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

struct SharpeCost {
  mu: Vec<f64>,
  cov: Vec<Vec<f64>>,
  risk_free: f64,
  weight_cap: f64,
  penalty: f64,
}

impl CostFunction for SharpeCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    let w = softmax(x);

    let ret: f64 = w.iter().zip(self.mu.iter()).map(|(a, b)| a * b).sum();
    let mut var = 0.0;
    for (i, &wi) in w.iter().enumerate() {
      for (j, &wj) in w.iter().enumerate() {
        var += wi * wj * self.cov[i][j];
      }
    }
    let vol = var.max(0.0).sqrt();

    let mut cost = if vol < VOL_FLOOR {
      // Ratio undefined at zero volatility; keep the solver away from it.
      1e6
    } else {
      -((ret - self.risk_free) / vol)
    };
    for &wi in &w {
      let excess = wi - self.weight_cap;
      if excess > 0.0 {
        cost += self.penalty * excess * excess;
      }
    }

    Ok(cost)
  }
}

fn initial_param(config: &OptimizerConfig, n: usize) -> Result<Vec<f64>, FrontierError> {
  match &config.initial_weights {
    None => Ok(vec![0.0; n]),
    Some(w0) => {
      if w0.len() != n {
        return Err(FrontierError::Data(format!(
          "initial guess has {} weights for {n} instruments",
          w0.len()
        )));
      }
      if w0.iter().any(|&w| !w.is_finite() || w <= 0.0) {
        return Err(FrontierError::Data(
          "initial guess weights must be strictly positive".into(),
        ));
      }
      Ok(w0.iter().map(|w| w.ln()).collect())
    }
  }
}

fn initial_simplex(x0: &[f64]) -> Vec<Vec<f64>> {
  let mut simplex = Vec::with_capacity(x0.len() + 1);
  simplex.push(x0.to_vec());
  for i in 0..x0.len() {
    let mut point = x0.to_vec();
    point[i] += 1.0;
    simplex.push(point);
  }
  simplex
}

fn cap_violation(weights: &[f64], cap: f64) -> f64 {
  weights
    .iter()
    .map(|&w| (w - cap).max(0.0))
    .fold(0.0, f64::max)
}

/// Find the allocation maximizing `(return - risk_free) / volatility`
/// subject to full investment, `[0, 1]` bounds and the per-asset cap.
///
/// Infeasible cap/basket combinations are rejected upfront; a solver that
/// exhausts its iteration budget or leaves the cap violated surfaces as
/// [`FrontierError::Convergence`] with the last iterate, and a
/// zero-volatility optimum as [`FrontierError::DegenerateSolution`].
pub fn maximize_sharpe(
  moments: &Moments,
  config: &OptimizerConfig,
) -> Result<OptimizedPortfolio, FrontierError> {
  let n = moments.n_assets();
  if n == 0 {
    return Err(FrontierError::Data("no instruments to optimize".into()));
  }

  // n assets capped at `weight_cap` each can reach at most n * cap.
  if (n as f64) * config.weight_cap < 1.0 - 1e-9 {
    return Err(FrontierError::InfeasibleConstraints {
      assets: n,
      cap: config.weight_cap,
    });
  }

  let mu = moments.mean().to_vec();
  let cov: Vec<Vec<f64>> = moments.cov().rows().into_iter().map(|r| r.to_vec()).collect();

  let mut x_best = initial_param(config, n)?;

  for (round, &penalty) in PENALTY_SCHEDULE.iter().enumerate() {
    let cost = SharpeCost {
      mu: mu.clone(),
      cov: cov.clone(),
      risk_free: config.risk_free,
      weight_cap: config.weight_cap,
      penalty,
    };

    let solver = NelderMead::new(initial_simplex(&x_best))
      .with_sd_tolerance(1e-10)
      .map_err(|e| FrontierError::Convergence {
        message: format!("solver setup: {e}"),
        last_weights: softmax(&x_best),
      })?;

    let max_iters = config.max_iters;
    let res = Executor::new(cost, solver)
      .configure(|state| state.max_iters(max_iters))
      .run()
      .map_err(|e| FrontierError::Convergence {
        message: e.to_string(),
        last_weights: softmax(&x_best),
      })?;

    let best = res
      .state
      .best_param
      .clone()
      .ok_or_else(|| FrontierError::Convergence {
        message: "solver produced no iterate".into(),
        last_weights: softmax(&x_best),
      })?;

    if matches!(
      res.state.termination_status,
      TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    ) {
      return Err(FrontierError::Convergence {
        message: format!("iteration budget of {max_iters} exhausted"),
        last_weights: softmax(&best),
      });
    }

    x_best = best;
    let violation = cap_violation(&softmax(&x_best), config.weight_cap);
    debug!(round, penalty, violation, "penalty round finished");
    if violation <= 1e-6 {
      break;
    }
    warn!(round, violation, "weight cap still violated, escalating penalty");
  }

  let weights = softmax(&x_best);
  let violation = cap_violation(&weights, config.weight_cap);
  if violation > CAP_TOLERANCE {
    return Err(FrontierError::Convergence {
      message: format!("weight cap violated by {violation:.3e} after penalty escalation"),
      last_weights: weights,
    });
  }

  let weights = Array1::from(weights);
  let expected_return = portfolio_return(&weights, moments.mean());
  let volatility = portfolio_volatility(&weights, moments.cov());
  if volatility < VOL_FLOOR {
    return Err(FrontierError::DegenerateSolution);
  }
  let sharpe = (expected_return - config.risk_free) / volatility;

  Ok(OptimizedPortfolio {
    weights,
    expected_return,
    volatility,
    sharpe,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::Array2;
  use ndarray::array;

  use super::*;
  use crate::market::prices::PriceTable;
  use crate::market::returns::simple_returns;
  use crate::portfolio::moments::Moments;

  fn three_asset_moments() -> Moments {
    let dates = (0..5)
      .map(|i| chrono::NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap())
      .collect();
    let prices = PriceTable::new(
      vec!["AAA".into(), "BBB".into(), "CCC".into()],
      dates,
      array![
        [100.0, 50.0, 20.0],
        [108.0, 51.0, 21.5],
        [104.0, 53.0, 20.8],
        [112.0, 52.0, 22.4],
        [110.0, 54.0, 21.9]
      ],
    )
    .unwrap();
    Moments::from_returns(&simple_returns(&prices).unwrap()).unwrap()
  }

  #[test]
  fn optimum_satisfies_simplex_and_cap_constraints() {
    let moments = three_asset_moments();
    let config = OptimizerConfig {
      weight_cap: 0.50,
      ..OptimizerConfig::default()
    };
    let result = maximize_sharpe(&moments, &config).unwrap();

    assert_abs_diff_eq!(result.weights.sum(), 1.0, epsilon = 1e-6);
    for &w in result.weights.iter() {
      assert!(w >= -1e-9);
      assert!(w <= 0.50 + 1e-4);
    }
    assert!(result.volatility > 0.0);
  }

  #[test]
  fn infeasible_cap_is_rejected_upfront() {
    let dates = (0..4)
      .map(|i| chrono::NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap())
      .collect();
    let prices = PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      dates,
      array![[100.0, 50.0], [110.0, 52.0], [105.0, 55.0], [115.0, 53.0]],
    )
    .unwrap();
    let moments = Moments::from_returns(&simple_returns(&prices).unwrap()).unwrap();

    // 2 assets capped at 0.40 can invest at most 0.80 of the portfolio.
    let result = maximize_sharpe(&moments, &OptimizerConfig::default());
    assert!(matches!(
      result,
      Err(FrontierError::InfeasibleConstraints { assets: 2, .. })
    ));
  }

  #[test]
  fn symmetric_basket_gets_equal_weights() {
    // Equal means above the risk-free rate, equal variances, zero
    // covariance: the unique optimum is 1/N each.
    let mean = Array1::from_elem(5, 0.05);
    let cov = Array2::from_diag(&Array1::from_elem(5, 0.04));
    let moments = Moments::new(mean, cov).unwrap();

    let result = maximize_sharpe(&moments, &OptimizerConfig::default()).unwrap();
    assert_abs_diff_eq!(result.weights.sum(), 1.0, epsilon = 1e-6);
    for &w in result.weights.iter() {
      assert_abs_diff_eq!(w, 0.2, epsilon = 0.01);
    }
  }

  #[test]
  fn exhausted_iteration_budget_is_a_convergence_error() {
    let moments = three_asset_moments();
    let config = OptimizerConfig {
      max_iters: 1,
      ..OptimizerConfig::default()
    };

    match maximize_sharpe(&moments, &config) {
      Err(FrontierError::Convergence {
        message,
        last_weights,
      }) => {
        assert!(message.contains("iteration budget"));
        assert_eq!(last_weights.len(), 3);
        assert_abs_diff_eq!(last_weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
      }
      other => panic!("expected a convergence error, got {other:?}"),
    }
  }

  #[test]
  fn zero_covariance_matrix_is_degenerate() {
    let mean = Array1::from_elem(3, 0.05);
    let cov = Array2::zeros((3, 3));
    let moments = Moments::new(mean, cov).unwrap();

    let result = maximize_sharpe(&moments, &OptimizerConfig::default());
    assert!(matches!(result, Err(FrontierError::DegenerateSolution)));
  }

  #[test]
  fn explicit_initial_guess_is_validated() {
    let moments = three_asset_moments();
    let config = OptimizerConfig {
      weight_cap: 0.50,
      initial_weights: Some(vec![0.5, 0.5]),
      ..OptimizerConfig::default()
    };
    assert!(matches!(
      maximize_sharpe(&moments, &config),
      Err(FrontierError::Data(_))
    ));
  }
}
