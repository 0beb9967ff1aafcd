//! Domain types for FX rate history.
//!
//! - [`Date`]: Calendar date keyed as `YYYY-MM-DD`
//! - [`RateObservation`]: One day's EUR→USD rate
//! - [`DateRange`]: Inclusive span of calendar days
//! - [`RateSeries`]: Ascending, unique-dated sequence of observations

mod date;
mod rate;
mod series;

pub use date::Date;
pub use rate::RateObservation;
pub use series::{DateRange, RateSeries};
