//! # Market Data
//!
//! $$
//! r_t = \frac{P_t - P_{t-1}}{P_{t-1}}
//! $$
//!
//! Price tables, simple-return estimation and the price-data collaborator
//! seam. Acquisition of historical prices is external to the core; the
//! [`ClosePriceProvider`] trait is the boundary.

pub mod prices;
pub mod provider;
pub mod returns;
#[cfg(feature = "yahoo")]
pub mod yahoo;

pub use prices::PriceTable;
pub use provider::ClosePriceProvider;
pub use returns::ReturnSeries;
pub use returns::simple_returns;
