//! Utility modules for the delivery desk.
//!
//! - [`datetime`] - Parsing, formatting and comparing dates in Ecuador time

pub mod datetime;
