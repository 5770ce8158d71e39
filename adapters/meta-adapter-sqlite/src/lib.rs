//! SQLite implementation of the [`MetaAdapter`] storage trait.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use vantage::meta_adapter::{
	ContentFilter, CreateAccount, CreateContent, MetaAdapter, UpdateContent,
};
use vantage::permissions::PermissionGrant;
use vantage::prelude::*;
use vantage::types::{Account, AccountType, Content};

mod account;
mod content;
mod filter;
mod graph;
mod schema;
mod utils;

use schema::init_db;
use utils::inspect;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> VnResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	// Account management
	//********************
	async fn create_account(&self, data: &CreateAccount<'_>) -> VnResult<AccountId> {
		account::create(&self.db, data).await
	}

	async fn read_account(&self, account_id: AccountId) -> VnResult<Account> {
		account::read(&self.db, account_id).await
	}

	async fn read_account_by_name(&self, name: &str) -> VnResult<Account> {
		account::read_by_name(&self.db, name).await
	}

	async fn update_account_template(
		&self,
		account_id: AccountId,
		permissions: &str,
		grants: &[PermissionGrant],
	) -> VnResult<()> {
		account::update_template(&self.db, account_id, permissions, grants).await
	}

	async fn list_accounts_of_type(&self, typ: AccountType) -> VnResult<Vec<Account>> {
		account::list_of_type(&self.db, typ).await
	}

	async fn count_accounts_of_type(&self, typ: AccountType) -> VnResult<u32> {
		account::count_of_type(&self.db, typ).await
	}

	async fn account_permission_detail(
		&self,
		account_id: AccountId,
	) -> VnResult<Vec<PermissionGrant>> {
		account::permission_detail(&self.db, account_id).await
	}

	// Social graph
	//**************
	async fn create_connection_request(&self, from: AccountId, to: AccountId) -> VnResult<()> {
		graph::create_connection_request(&self.db, from, to).await
	}

	async fn approve_connection(&self, from: AccountId, to: AccountId) -> VnResult<()> {
		graph::approve_connection(&self.db, from, to).await
	}

	async fn network_of(&self, account_id: AccountId) -> VnResult<Vec<AccountId>> {
		graph::network_of(&self.db, account_id).await
	}

	async fn add_follow(&self, follower: AccountId, target: AccountId) -> VnResult<()> {
		graph::add_follow(&self.db, follower, target).await
	}

	async fn followed_of(&self, follower: AccountId) -> VnResult<Vec<AccountId>> {
		graph::followed_of(&self.db, follower).await
	}

	async fn add_member(
		&self,
		community_id: AccountId,
		member_id: AccountId,
		is_manager: bool,
	) -> VnResult<()> {
		graph::add_member(&self.db, community_id, member_id, is_manager).await
	}

	async fn remove_member(&self, community_id: AccountId, member_id: AccountId) -> VnResult<()> {
		graph::remove_member(&self.db, community_id, member_id).await
	}

	async fn communities_of(&self, member_id: AccountId) -> VnResult<Vec<AccountId>> {
		graph::communities_of(&self.db, member_id).await
	}

	async fn members_of(&self, community_id: AccountId) -> VnResult<Vec<AccountId>> {
		graph::members_of(&self.db, community_id).await
	}

	async fn is_member(&self, community_id: AccountId, member_id: AccountId) -> VnResult<bool> {
		graph::is_member(&self.db, community_id, member_id).await
	}

	async fn member_count(&self, community_id: AccountId) -> VnResult<u32> {
		graph::member_count(&self.db, community_id).await
	}

	// Content management
	//********************
	async fn create_content(&self, data: &CreateContent<'_>) -> VnResult<ContentId> {
		content::create(&self.db, data).await
	}

	async fn read_content(&self, content_id: ContentId) -> VnResult<Content> {
		content::read(&self.db, content_id).await
	}

	async fn update_content(
		&self,
		content_id: ContentId,
		data: &UpdateContent<'_>,
	) -> VnResult<()> {
		content::update(&self.db, content_id, data).await
	}

	async fn delete_content(&self, content_id: ContentId) -> VnResult<()> {
		content::delete(&self.db, content_id).await
	}

	async fn list_content(&self, filter: &ContentFilter) -> VnResult<Vec<Content>> {
		filter::list(&self.db, filter).await
	}

	async fn count_content(&self, filter: &ContentFilter) -> VnResult<u32> {
		filter::count(&self.db, filter).await
	}

	async fn content_permission_detail(
		&self,
		content_id: ContentId,
	) -> VnResult<Vec<PermissionGrant>> {
		content::permission_detail(&self.db, content_id).await
	}
}

// vim: ts=4
