//! coin-domain
//!
//! Pure domain models for the coin ledger (records, settings, aggregates).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod app_data;
pub mod record;
pub mod settings;
pub mod stats;

pub use app_data::*;
pub use record::*;
pub use settings::*;
pub use stats::*;
