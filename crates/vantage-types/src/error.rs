//! Error types shared by the core evaluator and the adapters.

pub type VnResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	/// Expected, caller-handleable denial (delete without can_delete,
	/// edit by non-author, anonymous save). Carries an actionable message.
	PermissionDenied(Box<str>),
	/// Fatal code/data mismatch (missing or duplicate system account,
	/// unknown permission template, role hierarchy cycle, kind change on
	/// an existing content row). Never recovered locally.
	Config(Box<str>),
	/// Impossible stored state (unknown kind/role/permission code read
	/// back from the database).
	Integrity(Box<str>),
	ValidationError(Box<str>),
	DbError,

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Integrity(err.to_string().into())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
			Error::Config(msg) => write!(f, "configuration error: {}", msg),
			Error::Integrity(msg) => write!(f, "integrity error: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

// vim: ts=4
