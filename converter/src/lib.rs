//! Currency conversion between tracked assets
//!
//! `calculator` holds the pure arithmetic; `session` holds the state of one
//! converter form (selected pair and amount text) on top of it.

pub mod calculator;
pub mod session;

pub use calculator::{conversion_rate, convert, parse_amount, price_of};
pub use session::{ConverterSession, Quote, QUICK_AMOUNTS};
