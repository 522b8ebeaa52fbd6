//! Market data models
//!
//! - `quote` - Quote data structure

mod quote;

pub use quote::Quote;
