//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Return moments, random allocation sampling and constrained Sharpe-ratio
//! optimization over the allocation simplex.

pub mod engine;
pub mod moments;
pub mod optimizer;
pub mod sampling;
pub mod types;

pub use engine::FrontierAnalysis;
pub use engine::FrontierEngine;
pub use engine::FrontierEngineConfig;
pub use moments::Moments;
pub use moments::portfolio_return;
pub use moments::portfolio_volatility;
pub use optimizer::OptimizerConfig;
pub use optimizer::maximize_sharpe;
pub use sampling::DEFAULT_SAMPLE_COUNT;
pub use sampling::sample_portfolios;
pub use sampling::select_extremes;
pub use types::FrontierExtremes;
pub use types::OptimizedPortfolio;
pub use types::ScoredPortfolio;
