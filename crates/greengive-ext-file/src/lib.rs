//! # GreenGive Ext File
//!
//! File-based fallback data for the GreenGive rate provider.
//!
//! This crate provides default [`FallbackStore`] implementations:
//! - [`JsonFallbackStore`]: rates loaded once from a JSON time-series file
//! - [`InMemoryFallbackStore`]: rates supplied in code
//! - [`EmptyFallbackStore`]: no rates at all
//!
//! The JSON file uses the Frankfurter time-series shape:
//!
//! ```json
//! {"base": "EUR", "rates": {"2025-07-01": {"USD": 1.05}}}
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod fallback;

pub use fallback::*;

use std::path::Path;

use greengive_traits::error::TraitError;

/// Load the fallback dataset for a currency pair from a JSON file.
pub fn create_file_fallback(
    path: impl AsRef<Path>,
    base_currency: &str,
    quote_currency: &str,
) -> Result<JsonFallbackStore, TraitError> {
    JsonFallbackStore::from_file(path, base_currency, quote_currency)
}
