//! App state type

use std::sync::Arc;

use vantage_types::meta_adapter::MetaAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub meta_adapter: Arc<dyn MetaAdapter>,
}

impl AppState {
	pub fn new(meta_adapter: Arc<dyn MetaAdapter>) -> App {
		Arc::new(AppState { meta_adapter })
	}
}

pub type App = Arc<AppState>;

// vim: ts=4
