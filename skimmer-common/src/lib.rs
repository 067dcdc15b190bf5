//! Common utilities shared across Skimmer crates.
//!
//! This crate is intentionally lightweight so that every workspace member can
//! depend on it without heavy transitive costs. Today it only hosts the
//! [`observability`] module, which centralises `tracing` initialisation for
//! binaries and integration tests.

pub mod observability;
