//! Shared utilities for the SQLite adapter: error mapping and query helpers.

use sqlx::sqlite::SqliteRow;

use vantage::prelude::*;

/// Build an IN clause over account/content ids. An empty list becomes an
/// on-purpose invalid id so the clause matches nothing.
pub(crate) fn push_id_in<'a>(
	query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>,
	ids: &'a [AccountId],
) {
	if ids.is_empty() {
		query.push("(-1)");
		return;
	}
	query.push("(");
	for (i, id) in ids.iter().enumerate() {
		if i > 0 {
			query.push(", ");
		}
		query.push_bind(id.0);
	}
	query.push(")");
}

/// Build an IN clause over stable string codes (roles, permissions)
pub(crate) fn push_code_in<'a>(
	query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>,
	codes: impl Iterator<Item = &'a str>,
) {
	query.push("(");
	for (i, code) in codes.enumerate() {
		if i > 0 {
			query.push(", ");
		}
		query.push_bind(code);
	}
	query.push(")");
}

/// Parse comma-separated string list into boxed array of boxed strings
pub(crate) fn parse_str_list(s: &str) -> Box<[Box<str>]> {
	s.split(',')
		.map(|s| s.trim().to_owned().into_boxed_str())
		.collect::<Vec<_>>()
		.into_boxed_slice()
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to VnResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> VnResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> VnResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Translate a write-path SQL error
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

// vim: ts=4
