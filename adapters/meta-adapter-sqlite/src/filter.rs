//! SQL compilation of the bulk visibility predicate.
//!
//! The clause disjunction joins the content rows onto the materialized
//! mapping tables and nothing else; template logic never appears here.
//! Matching several grant rows duplicates result rows, which is part of the
//! filter contract; `distinct` opts into SELECT DISTINCT.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::content::{content_from_row, CONTENT_COLUMNS};
use crate::utils::*;
use vantage::meta_adapter::{ContentFilter, ViewClause};
use vantage::prelude::*;
use vantage::types::Content;

fn push_clause<'a>(query: &mut QueryBuilder<'a, Sqlite>, clause: &'a ViewClause) {
	match clause {
		ViewClause::AuthoredBy(author) => {
			query.push("(c.author_id=");
			query.push_bind(author.0);
			query.push(")");
		}
		ViewClause::Grant(grant) => {
			if let Some(publishers) = &grant.publisher_in {
				if publishers.is_empty() {
					// on-purpose unsatisfiable clause
					query.push("0=1");
					return;
				}
			}
			query.push("(cp.permission=");
			query.push_bind(grant.object_permission.code());
			query.push(" AND cp.role IN ");
			push_code_in(query, grant.object_roles.iter().map(|role| role.code()));
			query.push(" AND ap.permission=");
			query.push_bind(grant.publisher_permission.code());
			query.push(" AND ap.role IN ");
			push_code_in(query, grant.publisher_roles.iter().map(|role| role.code()));
			if let Some(publishers) = &grant.publisher_in {
				query.push(" AND c.publisher_id IN ");
				push_id_in(query, publishers);
			}
			query.push(")");
		}
	}
}

fn build_query<'a>(filter: &'a ContentFilter, head: String) -> QueryBuilder<'a, Sqlite> {
	let mut query = QueryBuilder::new(head);
	if !filter.all {
		query.push(" LEFT JOIN content_perms cp ON cp.content_id=c.content_id");
		query.push(" LEFT JOIN account_perms ap ON ap.account_id=c.publisher_id");
	}
	query.push(" WHERE ");
	if filter.all {
		query.push("1=1");
	} else if filter.clauses.is_empty() {
		query.push("0=1");
	} else {
		query.push("(");
		for (i, clause) in filter.clauses.iter().enumerate() {
			if i > 0 {
				query.push(" OR ");
			}
			push_clause(&mut query, clause);
		}
		query.push(")");
	}
	if let Some(scope) = &filter.scope {
		query.push(" AND (c.publisher_id IN ");
		push_id_in(&mut query, &scope.publisher_in);
		query.push(" OR c.author_id=");
		query.push_bind(scope.author.0);
		query.push(")");
	}
	query
}

pub(crate) async fn list(db: &SqlitePool, filter: &ContentFilter) -> VnResult<Vec<Content>> {
	let head = format!(
		"SELECT {}{} FROM contents c",
		if filter.distinct && !filter.all { "DISTINCT " } else { "" },
		CONTENT_COLUMNS
	);
	let mut query = build_query(filter, head);
	query.push(" ORDER BY c.created_at DESC, c.content_id DESC");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	rows.iter().map(content_from_row).collect()
}

/// Counts exactly the rows `list` would return, duplicates included unless
/// the filter sets `distinct`.
pub(crate) async fn count(db: &SqlitePool, filter: &ContentFilter) -> VnResult<u32> {
	let head = if filter.distinct && !filter.all {
		"SELECT count(DISTINCT c.content_id) AS cnt FROM contents c"
	} else {
		"SELECT count(*) AS cnt FROM contents c"
	};
	let mut query = build_query(filter, head.to_string());
	map_res(query.build().fetch_one(db).await, |row| row.try_get("cnt"))
}

// vim: ts=4
