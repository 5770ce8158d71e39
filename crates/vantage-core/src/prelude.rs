//! Common imports for the core evaluator modules.

pub use vantage_types::prelude::*;

pub use crate::app::{App, AppState};
pub use crate::viewer::ViewerCtx;

// vim: ts=4
