//! Content rows and their materialized permission mapping.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::account::{grants_from_rows, replace_grants};
use crate::utils::*;
use vantage::meta_adapter::{CreateContent, UpdateContent};
use vantage::permissions::PermissionGrant;
use vantage::prelude::*;
use vantage::types::{Content, ContentBody, ContentKind};

pub(crate) const CONTENT_COLUMNS: &str = "c.content_id, c.kind, c.body, c.author_id, \
	c.publisher_id, c.permissions, c.translation_of, c.attachments, c.created_at";

pub(crate) fn content_from_row(row: &SqliteRow) -> VnResult<Content> {
	let kind: &str = row.try_get("kind").or(Err(Error::DbError))?;
	let kind = ContentKind::from_code(kind)?;
	let body: &str = row.try_get("body").or(Err(Error::DbError))?;
	let body: ContentBody = serde_json::from_str(body)?;
	if body.kind() != kind {
		return Err(Error::Integrity(
			format!("stored body does not match kind '{}'", kind.code()).into(),
		));
	}
	// an empty stored list means no attachments
	let attachments: Option<&str> = row.try_get("attachments").or(Err(Error::DbError))?;
	let attachments = attachments.filter(|s| !s.is_empty());
	Ok(Content {
		content_id: ContentId(row.try_get("content_id").or(Err(Error::DbError))?),
		kind,
		body,
		author: AccountId(row.try_get("author_id").or(Err(Error::DbError))?),
		publisher: AccountId(row.try_get("publisher_id").or(Err(Error::DbError))?),
		permissions: row.try_get("permissions").or(Err(Error::DbError))?,
		translation_of: row
			.try_get::<Option<i64>, _>("translation_of")
			.or(Err(Error::DbError))?
			.map(ContentId),
		attachments: attachments.map(parse_str_list),
		created_at: Timestamp(row.try_get("created_at").or(Err(Error::DbError))?),
	})
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateContent<'_>) -> VnResult<ContentId> {
	let body = serde_json::to_string(data.body)?;
	let mut tx = db.begin().await.map_err(db_err)?;

	let row = sqlx::query(
		"INSERT INTO contents (kind, body, author_id, publisher_id, permissions, translation_of, attachments)
		VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING content_id",
	)
	.bind(data.body.kind().code())
	.bind(&body)
	.bind(data.author.0)
	.bind(data.publisher.0)
	.bind(data.permissions)
	.bind(data.translation_of.map(|id| id.0))
	.bind(data.attachments.filter(|s| !s.is_empty()).map(|s| s.join(",")))
	.fetch_one(&mut *tx)
	.await
	.map_err(db_err)?;
	let content_id: i64 = row.try_get(0).or(Err(Error::DbError))?;

	replace_grants(&mut tx, "content_perms", "content_id", content_id, &data.grants).await?;
	tx.commit().await.map_err(db_err)?;

	Ok(ContentId(content_id))
}

pub(crate) async fn read(db: &SqlitePool, content_id: ContentId) -> VnResult<Content> {
	let sql = format!("SELECT {} FROM contents c WHERE c.content_id=?", CONTENT_COLUMNS);
	let res = sqlx::query(&sql).bind(content_id.0).fetch_one(db).await;
	match res {
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => Err(db_err(err)),
		Ok(row) => content_from_row(&row),
	}
}

/// Replace body, template name and mapping rows in one transaction
pub(crate) async fn update(
	db: &SqlitePool,
	content_id: ContentId,
	data: &UpdateContent<'_>,
) -> VnResult<()> {
	let body = serde_json::to_string(data.body)?;
	let mut tx = db.begin().await.map_err(db_err)?;

	let res = sqlx::query(
		"UPDATE contents SET body=?, permissions=?, attachments=? WHERE content_id=? AND kind=?",
	)
	.bind(&body)
	.bind(data.permissions)
	.bind(data.attachments.filter(|s| !s.is_empty()).map(|s| s.join(",")))
	.bind(content_id.0)
	.bind(data.body.kind().code())
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	replace_grants(&mut tx, "content_perms", "content_id", content_id.0, &data.grants).await?;
	tx.commit().await.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, content_id: ContentId) -> VnResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let res = sqlx::query("DELETE FROM contents WHERE content_id=?")
		.bind(content_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	sqlx::query("DELETE FROM content_perms WHERE content_id=?")
		.bind(content_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn permission_detail(
	db: &SqlitePool,
	content_id: ContentId,
) -> VnResult<Vec<PermissionGrant>> {
	let rows = sqlx::query("SELECT permission, role FROM content_perms WHERE content_id=?")
		.bind(content_id.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	grants_from_rows(&rows)
}

// vim: ts=4
