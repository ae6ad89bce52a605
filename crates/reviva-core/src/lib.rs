//! Core types and trait definitions for Reviva.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It holds
//! the customer model, the campaign configuration, date helpers, the clock
//! seam, and the two traits the rest of the workspace is built around:
//! [`store::CustomerStore`] and [`generator::TextGenerator`].

pub mod clock;
pub mod config;
pub mod customer;
pub mod dates;
pub mod demo;
pub mod error;
pub mod generator;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
