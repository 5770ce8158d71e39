//! Account rows and their materialized permission mapping.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::utils::*;
use vantage::meta_adapter::CreateAccount;
use vantage::permissions::{Permission, PermissionGrant};
use vantage::prelude::*;
use vantage::roles::Role;
use vantage::types::{Account, AccountType};

pub(crate) fn account_from_row(row: &SqliteRow) -> VnResult<Account> {
	let typ: &str = row.try_get("type").or(Err(Error::DbError))?;
	Ok(Account {
		account_id: AccountId(row.try_get("account_id").or(Err(Error::DbError))?),
		name: row.try_get("name").or(Err(Error::DbError))?,
		typ: AccountType::from_code(typ)?,
		permissions: row.try_get("permissions").or(Err(Error::DbError))?,
		created_at: Timestamp(row.try_get("created_at").or(Err(Error::DbError))?),
	})
}

/// Delete and re-insert the mapping rows for one object inside the caller's
/// transaction. The mapping is never observed half-written because the
/// surrounding save commits it together with the object row.
pub(crate) async fn replace_grants(
	tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	table: &str,
	id_col: &str,
	id: i64,
	grants: &[PermissionGrant],
) -> VnResult<()> {
	let delete_sql = format!("DELETE FROM {} WHERE {}=?", table, id_col);
	sqlx::query(&delete_sql).bind(id).execute(&mut **tx).await.map_err(db_err)?;

	let insert_sql =
		format!("INSERT OR IGNORE INTO {} ({}, permission, role) VALUES (?, ?, ?)", table, id_col);
	for grant in grants {
		sqlx::query(&insert_sql)
			.bind(id)
			.bind(grant.permission.code())
			.bind(grant.role.code())
			.execute(&mut **tx)
			.await
			.map_err(db_err)?;
	}
	Ok(())
}

pub(crate) fn grants_from_rows(rows: &[SqliteRow]) -> VnResult<Vec<PermissionGrant>> {
	rows.iter()
		.map(|row| {
			let permission: &str = row.try_get("permission").or(Err(Error::DbError))?;
			let role: &str = row.try_get("role").or(Err(Error::DbError))?;
			Ok(PermissionGrant {
				permission: Permission::from_code(permission)?,
				role: Role::from_code(role)?,
			})
		})
		.collect()
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateAccount<'_>) -> VnResult<AccountId> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let row = sqlx::query(
		"INSERT INTO accounts (name, type, permissions) VALUES (?, ?, ?) RETURNING account_id",
	)
	.bind(data.name)
	.bind(data.typ.code())
	.bind(data.permissions)
	.fetch_one(&mut *tx)
	.await
	.map_err(db_err)?;
	let account_id: i64 = row.try_get(0).or(Err(Error::DbError))?;

	replace_grants(&mut tx, "account_perms", "account_id", account_id, &data.grants).await?;
	tx.commit().await.map_err(db_err)?;

	Ok(AccountId(account_id))
}

pub(crate) async fn read(db: &SqlitePool, account_id: AccountId) -> VnResult<Account> {
	let res = sqlx::query(
		"SELECT account_id, name, type, permissions, created_at FROM accounts WHERE account_id=?",
	)
	.bind(account_id.0)
	.fetch_one(db)
	.await;
	match res {
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => Err(db_err(err)),
		Ok(row) => account_from_row(&row),
	}
}

pub(crate) async fn read_by_name(db: &SqlitePool, name: &str) -> VnResult<Account> {
	let res = sqlx::query(
		"SELECT account_id, name, type, permissions, created_at FROM accounts WHERE name=?",
	)
	.bind(name)
	.fetch_one(db)
	.await;
	match res {
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => Err(db_err(err)),
		Ok(row) => account_from_row(&row),
	}
}

pub(crate) async fn list_of_type(db: &SqlitePool, typ: AccountType) -> VnResult<Vec<Account>> {
	let rows = sqlx::query(
		"SELECT account_id, name, type, permissions, created_at FROM accounts
		WHERE type=? ORDER BY account_id",
	)
	.bind(typ.code())
	.fetch_all(db)
	.await
	.map_err(db_err)?;
	rows.iter().map(account_from_row).collect()
}

pub(crate) async fn count_of_type(db: &SqlitePool, typ: AccountType) -> VnResult<u32> {
	map_res(
		sqlx::query("SELECT count(*) AS cnt FROM accounts WHERE type=?")
			.bind(typ.code())
			.fetch_one(db)
			.await,
		|row| row.try_get("cnt"),
	)
}

/// Replace the template name and the mapping rows in one transaction
pub(crate) async fn update_template(
	db: &SqlitePool,
	account_id: AccountId,
	permissions: &str,
	grants: &[PermissionGrant],
) -> VnResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let res = sqlx::query("UPDATE accounts SET permissions=? WHERE account_id=?")
		.bind(permissions)
		.bind(account_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	replace_grants(&mut tx, "account_perms", "account_id", account_id.0, grants).await?;
	tx.commit().await.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn permission_detail(
	db: &SqlitePool,
	account_id: AccountId,
) -> VnResult<Vec<PermissionGrant>> {
	let rows = sqlx::query("SELECT permission, role FROM account_perms WHERE account_id=?")
		.bind(account_id.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	grants_from_rows(&rows)
}

// vim: ts=4
