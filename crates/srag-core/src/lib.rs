//! Core types and trait definitions for the SRAG dashboard.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! calculators here are stateless and reach persisted data only through the
//! [`store::CaseStore`] trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod metric;
pub mod metrics;
pub mod regions;
pub mod store;

pub use error::{Error, Result};
