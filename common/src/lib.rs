//! PayConsole Common Types
//!
//! Value types shared by the currency display layer: currency codes, rate
//! tables, raw display amounts, and the country/merchant selections that the
//! selection stores own.

pub mod identifiers;
pub mod monetary;
pub mod selection;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use selection::*;
pub use error::*;
pub use time::*;
