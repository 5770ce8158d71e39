//! Shared types, adapter traits, and core utilities for the Vantage
//! permission-and-visibility engine.
//!
//! This crate contains the foundational types that are shared between the
//! core evaluator crate and all adapter implementations. Extracting these
//! into a separate crate allows adapter crates to compile in parallel with
//! the evaluator.

pub mod error;
pub mod meta_adapter;
pub mod permissions;
pub mod prelude;
pub mod roles;
pub mod types;

// vim: ts=4
