//! # GreenGive Traits
//!
//! Trait definitions for the GreenGive rate provider.
//!
//! This crate contains ONLY trait definitions with ZERO runtime dependencies.
//! All implementations are in separate extension crates.
//!
//! ## Module Structure
//!
//! - [`rate_source`]: Upstream single-date rate sources and local fallback stores
//! - [`error`]: Per-attempt source failures
//!
//! ## Dependency Injection
//!
//! The resilient provider uses these traits via dependency injection:
//!
//! ```ignore
//! ResilientRateProviderBuilder::new()
//!     .with_source(Arc::new(impl RateSource))
//!     .with_fallback(Arc::new(impl FallbackStore))
//!     .build()?
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod rate_source;

// Re-export commonly used types
pub use error::TraitError;
pub use rate_source::{FallbackStore, RateSource, RawRate, SourceType};
