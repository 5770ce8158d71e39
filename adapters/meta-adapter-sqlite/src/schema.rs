//! Database schema initialization.

use sqlx::SqlitePool;

/// Create all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Accounts
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS accounts (
			account_id integer PRIMARY KEY AUTOINCREMENT,
			name text NOT NULL UNIQUE,
			type char(1) NOT NULL,
			permissions text NOT NULL,
			created_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_type ON accounts(type)")
		.execute(&mut *tx)
		.await?;

	// Materialized permission mapping, one table per securable type.
	// Rows are fully replaced whenever the owning object is saved.
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS account_perms (
			account_id integer NOT NULL,
			permission text NOT NULL,
			role text NOT NULL,
			PRIMARY KEY(account_id, permission, role)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Content
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS contents (
			content_id integer PRIMARY KEY AUTOINCREMENT,
			kind text NOT NULL,
			body json NOT NULL,
			author_id integer NOT NULL,
			publisher_id integer NOT NULL,
			permissions text NOT NULL,
			translation_of integer,
			attachments text,
			created_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_contents_publisher ON contents(publisher_id)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_contents_author ON contents(author_id)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS content_perms (
			content_id integer NOT NULL,
			permission text NOT NULL,
			role text NOT NULL,
			PRIMARY KEY(content_id, permission, role)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Social graph
	//**************
	// Symmetric network edges; a row exists per direction once approved
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS connections (
			account_id integer NOT NULL,
			peer_id integer NOT NULL,
			approved boolean NOT NULL DEFAULT 0,
			created_at datetime DEFAULT (unixepoch()),
			PRIMARY KEY(account_id, peer_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Asymmetric follow edges, no approval workflow
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS follows (
			follower_id integer NOT NULL,
			target_id integer NOT NULL,
			created_at datetime DEFAULT (unixepoch()),
			PRIMARY KEY(follower_id, target_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS community_members (
			community_id integer NOT NULL,
			member_id integer NOT NULL,
			is_manager boolean NOT NULL DEFAULT 0,
			created_at datetime DEFAULT (unixepoch()),
			PRIMARY KEY(community_id, member_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_community_members_member ON community_members(member_id)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
