//! # Visualization
//!
//! $$
//! \{(\sigma_k, \mu_k)\}_{k=1}^K \mapsto \text{frontier scatter}
//! $$
//!
//! Rendering collaborator for the sampled frontier: the scored batch as a
//! marker cloud in (volatility, return) space with the two selected
//! extremes highlighted. Correctness of the pipeline never depends on this
//! module; it only consumes finished results.

use std::path::Path;

use plotly::Plot;
use plotly::Scatter;
use plotly::common::Marker;
use plotly::common::MarkerSymbol;
use plotly::common::Mode;
use plotly::common::Title;
use plotly::common::color::NamedColor;
use plotly::layout::Axis;
use plotly::layout::Layout;

use crate::portfolio::types::FrontierExtremes;
use crate::portfolio::types::ScoredPortfolio;

/// Builder for the frontier scatter chart.
#[derive(Clone, Debug)]
pub struct FrontierChart {
  title: String,
  marker_size: usize,
}

impl Default for FrontierChart {
  fn default() -> Self {
    Self::new()
  }
}

impl FrontierChart {
  pub fn new() -> Self {
    Self {
      title: "Portfolio Simulations".to_string(),
      marker_size: 5,
    }
  }

  pub fn title(mut self, title: &str) -> Self {
    self.title = title.into();
    self
  }

  pub fn marker_size(mut self, size: usize) -> Self {
    self.marker_size = size;
    self
  }

  /// Assemble the plot from a scored batch and its frontier picks.
  pub fn build(&self, samples: &[ScoredPortfolio], extremes: &FrontierExtremes) -> Plot {
    let vols: Vec<f64> = samples.iter().map(|s| s.volatility).collect();
    let rets: Vec<f64> = samples.iter().map(|s| s.expected_return).collect();

    let cloud = Scatter::new(vols, rets)
      .mode(Mode::Markers)
      .name("simulated portfolios")
      .marker(Marker::new().size(self.marker_size));

    let max_ratio = Scatter::new(
      vec![extremes.max_ratio.volatility],
      vec![extremes.max_ratio.expected_return],
    )
    .mode(Mode::Markers)
    .name("max ratio")
    .marker(
      Marker::new()
        .symbol(MarkerSymbol::Star)
        .size(3 * self.marker_size)
        .color(NamedColor::Red),
    );

    let min_volatility = Scatter::new(
      vec![extremes.min_volatility.volatility],
      vec![extremes.min_volatility.expected_return],
    )
    .mode(Mode::Markers)
    .name("min volatility")
    .marker(
      Marker::new()
        .symbol(MarkerSymbol::Star)
        .size(3 * self.marker_size)
        .color(NamedColor::Blue),
    );

    let mut plot = Plot::new();
    plot.add_trace(cloud);
    plot.add_trace(max_ratio);
    plot.add_trace(min_volatility);
    plot.set_layout(
      Layout::new()
        .title(Title::from(self.title.as_str()))
        .x_axis(Axis::new().title("Volatility (risk)"))
        .y_axis(Axis::new().title("Expected return")),
    );
    plot
  }

  /// Render the chart to an HTML file at `path`.
  pub fn write_html<P: AsRef<Path>>(
    &self,
    samples: &[ScoredPortfolio],
    extremes: &FrontierExtremes,
    path: P,
  ) {
    self.build(samples, extremes).write_html(path);
  }
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  fn fixture() -> (Vec<ScoredPortfolio>, FrontierExtremes) {
    let a = ScoredPortfolio {
      weights: array![0.6, 0.4],
      expected_return: 0.04,
      volatility: 0.02,
      ratio: 2.0,
    };
    let b = ScoredPortfolio {
      weights: array![0.3, 0.7],
      expected_return: 0.03,
      volatility: 0.015,
      ratio: 2.0,
    };
    let extremes = FrontierExtremes {
      max_ratio: a.clone(),
      min_volatility: b.clone(),
    };
    (vec![a, b], extremes)
  }

  #[test]
  fn chart_is_written_to_the_configured_path() {
    let (samples, extremes) = fixture();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frontier.html");

    FrontierChart::new()
      .title("test frontier")
      .write_html(&samples, &extremes, &path);

    assert!(path.exists());
  }
}
