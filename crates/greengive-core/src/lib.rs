//! # GreenGive Core
//!
//! Core types for the GreenGive FX rate service.
//!
//! This crate provides the foundational building blocks used throughout GreenGive:
//!
//! - **Types**: [`Date`], [`RateObservation`], [`DateRange`] and [`RateSeries`]
//! - **Errors**: [`CoreError`] for validation failures
//!
//! ## Design Philosophy
//!
//! - **Validated construction**: a [`RateObservation`] built from upstream data
//!   always carries a positive rate
//! - **Gap-free series**: a [`RateSeries`] built for a [`DateRange`] holds exactly
//!   one observation per calendar day
//!
//! ## Example
//!
//! ```rust
//! use greengive_core::prelude::*;
//!
//! let date = Date::parse("2025-07-01").unwrap();
//! let obs = RateObservation::from_f64(date, 1.05).unwrap();
//! assert_eq!(obs.date, date);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap)]

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{Date, DateRange, RateObservation, RateSeries};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, DateRange, RateObservation, RateSeries};
}
