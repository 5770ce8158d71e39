//! Common imports for crates built on the Vantage engine.

pub use crate::error::{Error, VnResult};
pub use crate::types::{now, AccountId, ContentId, Timestamp};

pub use tracing::{debug, error, info, trace, warn};

// vim: ts=4
