//! Roadshow Server Library
//!
//! Exposes server components for integration testing.

pub mod api;
pub mod driver;
pub mod state;
