//! # Return Moments
//!
//! $$
//! \mu_i = \mathbb E[r_i], \qquad \Sigma_{ij} = \operatorname{Cov}(r_i, r_j)
//! $$
//!
//! Mean-return vector and sample covariance matrix derived once from the
//! return series, plus the quadratic-form scoring helpers used by both the
//! sampler and the optimizer.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;
use ndarray_stats::CorrelationExt;

use crate::error::FrontierError;
use crate::market::returns::ReturnSeries;

/// Mean vector and covariance matrix of a return series, read-only after
/// construction.
#[derive(Clone, Debug)]
pub struct Moments {
  mean: Array1<f64>,
  cov: Array2<f64>,
}

impl Moments {
  /// Build moments from an externally estimated mean vector and covariance
  /// matrix. The matrix must be square and aligned to the mean vector.
  pub fn new(mean: Array1<f64>, cov: Array2<f64>) -> Result<Self, FrontierError> {
    let n = mean.len();
    if n == 0 {
      return Err(FrontierError::Data("mean vector is empty".into()));
    }
    if cov.nrows() != n || cov.ncols() != n {
      return Err(FrontierError::Data(format!(
        "covariance is {}x{} for {n} instruments",
        cov.nrows(),
        cov.ncols()
      )));
    }
    Ok(Self { mean, cov })
  }

  /// Derive moments from a return series. Covariance uses ddof = 1, so at
  /// least two return rows are required.
  pub fn from_returns(returns: &ReturnSeries) -> Result<Self, FrontierError> {
    let n_obs = returns.n_periods();
    if n_obs < 2 {
      return Err(FrontierError::Data(format!(
        "need at least 2 return rows for mean/covariance, got {n_obs}"
      )));
    }

    let mean = returns
      .values()
      .mean_axis(Axis(0))
      .ok_or_else(|| FrontierError::Data("return series has no rows".into()))?;

    // CorrelationExt::cov expects rows = variables.
    let cov = returns
      .values()
      .t()
      .cov(1.0)
      .map_err(|e| FrontierError::Data(format!("covariance: {e}")))?;

    Ok(Self { mean, cov })
  }

  /// Mean return per instrument, aligned to the return series columns.
  pub fn mean(&self) -> &Array1<f64> {
    &self.mean
  }

  /// Symmetric covariance matrix of the instrument returns.
  pub fn cov(&self) -> &Array2<f64> {
    &self.cov
  }

  /// Number of instruments.
  pub fn n_assets(&self) -> usize {
    self.mean.len()
  }
}

/// Expected portfolio return `w · mu`.
pub fn portfolio_return(weights: &Array1<f64>, mean: &Array1<f64>) -> f64 {
  weights.dot(mean)
}

/// Portfolio volatility `sqrt(w' Sigma w)`. The quadratic form can go
/// negative by rounding; it is clamped to 0 before the square root.
pub fn portfolio_volatility(weights: &Array1<f64>, cov: &Array2<f64>) -> f64 {
  weights.dot(&cov.dot(weights)).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use chrono::NaiveDate;
  use ndarray::array;

  use super::*;
  use crate::market::prices::PriceTable;
  use crate::market::returns::simple_returns;

  fn fixture_returns() -> ReturnSeries {
    let dates = (0..4)
      .map(|i| NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap())
      .collect();
    let prices = PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      dates,
      array![[100.0, 50.0], [110.0, 52.0], [105.0, 55.0], [115.0, 53.0]],
    )
    .unwrap();
    simple_returns(&prices).unwrap()
  }

  #[test]
  fn mean_and_covariance_match_hand_computation() {
    let returns = fixture_returns();
    let moments = Moments::from_returns(&returns).unwrap();

    let col0 = [0.10, -5.0 / 110.0, 10.0 / 105.0];
    let col1 = [0.04, 3.0 / 52.0, -2.0 / 55.0];
    let m0: f64 = col0.iter().sum::<f64>() / 3.0;
    let m1: f64 = col1.iter().sum::<f64>() / 3.0;

    assert_abs_diff_eq!(moments.mean()[0], m0, epsilon = 1e-12);
    assert_abs_diff_eq!(moments.mean()[1], m1, epsilon = 1e-12);

    let var0: f64 = col0.iter().map(|r| (r - m0).powi(2)).sum::<f64>() / 2.0;
    let cov01: f64 = col0
      .iter()
      .zip(col1.iter())
      .map(|(a, b)| (a - m0) * (b - m1))
      .sum::<f64>()
      / 2.0;

    assert_abs_diff_eq!(moments.cov()[[0, 0]], var0, epsilon = 1e-12);
    assert_abs_diff_eq!(moments.cov()[[0, 1]], cov01, epsilon = 1e-12);
    assert_abs_diff_eq!(
      moments.cov()[[0, 1]],
      moments.cov()[[1, 0]],
      epsilon = 1e-15
    );
  }

  #[test]
  fn quadratic_form_clamps_rounding_noise() {
    let weights = array![0.5, 0.5];
    let cov = array![[0.0, -1e-18], [-1e-18, 0.0]];
    assert_eq!(portfolio_volatility(&weights, &cov), 0.0);
  }

  #[test]
  fn single_return_row_is_a_data_error() {
    let dates = (0..2)
      .map(|i| NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap())
      .collect();
    let prices = PriceTable::new(
      vec!["AAA".into(), "BBB".into()],
      dates,
      array![[100.0, 50.0], [110.0, 52.0]],
    )
    .unwrap();
    let returns = simple_returns(&prices).unwrap();
    assert!(matches!(
      Moments::from_returns(&returns),
      Err(FrontierError::Data(_))
    ));
  }
}
