//! # Efficient Frontier
//!
//! `efficient_frontier` approximates the efficient frontier of a fixed
//! instrument basket by Monte Carlo sampling of the allocation simplex and
//! computes a constrained Sharpe-optimal allocation from the same return
//! moments.
//!
//! ## Modules
//!
//! | Module            | Description                                                               |
//! |-------------------|---------------------------------------------------------------------------|
//! | [`market`]        | Price tables, simple-return estimation and the price-data collaborator.   |
//! | [`portfolio`]     | Return moments, random portfolio sampling and the constrained optimizer.  |
//! | [`report`]        | Fixed-precision console report of the optimized allocation.               |
//! | [`visualization`] | Frontier scatter chart rendering.                                         |
//! | [`error`]         | Typed failure taxonomy shared across the crate.                           |
//!
//! ## Example Usage
//!
//! ```rust
//! use efficient_frontier::portfolio::FrontierEngine;
//! use efficient_frontier::portfolio::FrontierEngineConfig;
//!
//! let engine = FrontierEngine::new(FrontierEngineConfig::default());
//! ```
//!
//! ## Features
//!
//! - `yahoo`: enables the Yahoo Finance implementation of the price-data
//!   collaborator

pub mod error;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod visualization;

pub use error::FrontierError;
