//! Core authorization evaluator for the Vantage engine.
//!
//! This crate decides, for any (viewer, content) pair, whether the viewer may
//! see, edit or delete that content, and produces the composable bulk filter
//! used to enumerate everything a viewer may reach. Storage is abstracted
//! behind the `MetaAdapter` trait from `vantage-types`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod bootstrap;
pub mod community;
pub mod content;
pub mod evaluator;
pub mod prelude;
pub mod viewer;

// Re-export commonly used types
pub use app::{App, AppState};
pub use viewer::ViewerCtx;

// vim: ts=4
