//! Core library for the insurance lead marketplace.
//!
//! Two domains live here: `rating`, the multi-carrier quote computation over a
//! static carrier catalog, and `marketplace`, the provider-buyer connection
//! lifecycle with its lead ledger. Everything else is the ambient service
//! stack: configuration, telemetry, and the shared error type.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod rating;
pub mod telemetry;
