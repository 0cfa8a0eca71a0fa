//! Shared building blocks for the portfolio backend crates.

pub mod env;
pub mod types;
pub mod utils;
