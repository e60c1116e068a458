//! Downstream consumers of resolved quotes.

pub mod valuation;
