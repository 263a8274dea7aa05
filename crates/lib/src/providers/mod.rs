//! # Providers
//!
//! Pluggable transports the enrichment core talks through.

pub mod connection;
