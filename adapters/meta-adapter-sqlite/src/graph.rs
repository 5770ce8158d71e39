//! Social graph edges: connections (symmetric, approval-gated), follows
//! (asymmetric), and community membership.

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use vantage::prelude::*;

pub(crate) async fn create_connection_request(
	db: &SqlitePool,
	from: AccountId,
	to: AccountId,
) -> VnResult<()> {
	sqlx::query("INSERT OR IGNORE INTO connections (account_id, peer_id, approved) VALUES (?, ?, 0)")
		.bind(from.0)
		.bind(to.0)
		.execute(db)
		.await
		.map_err(db_err)?;
	Ok(())
}

/// Approve a pending request; writes the mirror row so the edge reads
/// symmetrically from both sides.
pub(crate) async fn approve_connection(
	db: &SqlitePool,
	from: AccountId,
	to: AccountId,
) -> VnResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let res = sqlx::query(
		"UPDATE connections SET approved=1 WHERE account_id=? AND peer_id=? AND approved=0",
	)
	.bind(from.0)
	.bind(to.0)
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	sqlx::query(
		"INSERT INTO connections (account_id, peer_id, approved) VALUES (?, ?, 1)
		ON CONFLICT(account_id, peer_id) DO UPDATE SET approved=1",
	)
	.bind(to.0)
	.bind(from.0)
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn network_of(db: &SqlitePool, account_id: AccountId) -> VnResult<Vec<AccountId>> {
	let rows = sqlx::query("SELECT peer_id FROM connections WHERE account_id=? AND approved=1")
		.bind(account_id.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	collect_res(rows.iter().map(|row| Ok(AccountId(row.try_get("peer_id")?))))
}

pub(crate) async fn add_follow(
	db: &SqlitePool,
	follower: AccountId,
	target: AccountId,
) -> VnResult<()> {
	sqlx::query("INSERT OR IGNORE INTO follows (follower_id, target_id) VALUES (?, ?)")
		.bind(follower.0)
		.bind(target.0)
		.execute(db)
		.await
		.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn followed_of(
	db: &SqlitePool,
	follower: AccountId,
) -> VnResult<Vec<AccountId>> {
	let rows = sqlx::query("SELECT target_id FROM follows WHERE follower_id=?")
		.bind(follower.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	collect_res(rows.iter().map(|row| Ok(AccountId(row.try_get("target_id")?))))
}

/// Membership upsert; joining twice is a no-op
pub(crate) async fn add_member(
	db: &SqlitePool,
	community_id: AccountId,
	member_id: AccountId,
	is_manager: bool,
) -> VnResult<()> {
	sqlx::query(
		"INSERT INTO community_members (community_id, member_id, is_manager) VALUES (?, ?, ?)
		ON CONFLICT(community_id, member_id) DO NOTHING",
	)
	.bind(community_id.0)
	.bind(member_id.0)
	.bind(is_manager)
	.execute(db)
	.await
	.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn remove_member(
	db: &SqlitePool,
	community_id: AccountId,
	member_id: AccountId,
) -> VnResult<()> {
	sqlx::query("DELETE FROM community_members WHERE community_id=? AND member_id=?")
		.bind(community_id.0)
		.bind(member_id.0)
		.execute(db)
		.await
		.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn communities_of(
	db: &SqlitePool,
	member_id: AccountId,
) -> VnResult<Vec<AccountId>> {
	let rows = sqlx::query("SELECT community_id FROM community_members WHERE member_id=?")
		.bind(member_id.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	collect_res(rows.iter().map(|row| Ok(AccountId(row.try_get("community_id")?))))
}

pub(crate) async fn members_of(
	db: &SqlitePool,
	community_id: AccountId,
) -> VnResult<Vec<AccountId>> {
	let rows = sqlx::query("SELECT member_id FROM community_members WHERE community_id=?")
		.bind(community_id.0)
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	collect_res(rows.iter().map(|row| Ok(AccountId(row.try_get("member_id")?))))
}

pub(crate) async fn is_member(
	db: &SqlitePool,
	community_id: AccountId,
	member_id: AccountId,
) -> VnResult<bool> {
	map_res(
		sqlx::query(
			"SELECT count(*) AS cnt FROM community_members WHERE community_id=? AND member_id=?",
		)
		.bind(community_id.0)
		.bind(member_id.0)
		.fetch_one(db)
		.await,
		|row| Ok(row.try_get::<u32, _>("cnt")? > 0),
	)
}

pub(crate) async fn member_count(db: &SqlitePool, community_id: AccountId) -> VnResult<u32> {
	map_res(
		sqlx::query("SELECT count(*) AS cnt FROM community_members WHERE community_id=?")
			.bind(community_id.0)
			.fetch_one(db)
			.await,
		|row| row.try_get("cnt"),
	)
}

// vim: ts=4
