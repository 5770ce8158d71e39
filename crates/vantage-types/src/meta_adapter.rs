//! Storage adapter trait for the social graph and the permission mapping
//! store.
//!
//! The mapping tables materialized by the adapter are the only place bulk
//! filters may join against: template logic is resolved once in the core and
//! handed to the adapter as finished rows, so the single-object check and the
//! bulk filter read the same data and cannot drift.

use async_trait::async_trait;

use crate::error::VnResult;
use crate::permissions::{Permission, PermissionGrant};
use crate::roles::Role;
use crate::types::{Account, AccountId, AccountType, Content, ContentBody, ContentId};

#[derive(Debug)]
pub struct CreateAccount<'a> {
	pub name: &'a str,
	pub typ: AccountType,
	/// Account template name, stored alongside the materialized rows
	pub permissions: &'a str,
	/// Mapping rows resolved from `permissions`, written in the same
	/// transaction as the account row
	pub grants: Vec<PermissionGrant>,
}

#[derive(Debug)]
pub struct CreateContent<'a> {
	pub body: &'a ContentBody,
	pub author: AccountId,
	pub publisher: AccountId,
	pub permissions: &'a str,
	pub translation_of: Option<ContentId>,
	pub attachments: Option<&'a [Box<str>]>,
	pub grants: Vec<PermissionGrant>,
}

#[derive(Debug)]
pub struct UpdateContent<'a> {
	pub body: &'a ContentBody,
	pub permissions: &'a str,
	pub attachments: Option<&'a [Box<str>]>,
	pub grants: Vec<PermissionGrant>,
}

/// One conjunction of the visibility disjunction: the object must grant
/// `object_permission` at one of `object_roles`, the publisher must grant
/// `publisher_permission` at one of `publisher_roles`, and (when present)
/// the publisher must be in `publisher_in`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantClause {
	pub publisher_in: Option<Vec<AccountId>>,
	pub object_permission: Permission,
	pub object_roles: Vec<Role>,
	pub publisher_permission: Permission,
	pub publisher_roles: Vec<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewClause {
	Grant(GrantClause),
	/// Self-authored content is always visible to its author
	AuthoredBy(AccountId),
}

/// Restriction AND-ed on top of the visibility clauses for wall/followed
/// queries: publisher in the given set, or content authored by `author`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowScope {
	pub publisher_in: Vec<AccountId>,
	pub author: AccountId,
}

/// Compiled bulk visibility predicate.
///
/// Results are NOT deduplicated: the clause joins can match the same content
/// row more than once. Callers that need uniqueness must set `distinct`
/// explicitly; it is not applied silently because it costs a distinct scan
/// on every call.
#[derive(Clone, Debug, Default)]
pub struct ContentFilter {
	/// OR-ed visibility clauses; an empty list matches nothing
	pub clauses: Vec<ViewClause>,
	/// System bypass: match every row, ignoring `clauses`
	pub all: bool,
	pub scope: Option<FollowScope>,
	pub distinct: bool,
}

impl ContentFilter {
	/// Matches nothing. Used for anonymous queries against a non-internet
	/// deployment.
	pub fn none() -> Self {
		Self::default()
	}

	pub fn all() -> Self {
		Self { all: true, ..Self::default() }
	}

	pub fn matches_nothing(&self) -> bool {
		!self.all && self.clauses.is_empty()
	}
}

#[async_trait]
pub trait MetaAdapter: Send + Sync {
	// Account management
	//********************
	async fn create_account(&self, data: &CreateAccount<'_>) -> VnResult<AccountId>;
	async fn read_account(&self, account_id: AccountId) -> VnResult<Account>;
	async fn read_account_by_name(&self, name: &str) -> VnResult<Account>;
	/// Replace the account's template name and its mapping rows atomically
	async fn update_account_template(
		&self,
		account_id: AccountId,
		permissions: &str,
		grants: &[PermissionGrant],
	) -> VnResult<()>;
	async fn list_accounts_of_type(&self, typ: AccountType) -> VnResult<Vec<Account>>;
	async fn count_accounts_of_type(&self, typ: AccountType) -> VnResult<u32>;
	async fn account_permission_detail(&self, account_id: AccountId)
		-> VnResult<Vec<PermissionGrant>>;

	// Social graph
	//**************
	/// Record a pending connection request from `from` to `to`
	async fn create_connection_request(&self, from: AccountId, to: AccountId) -> VnResult<()>;
	/// Approve a pending request; the edge becomes symmetric
	async fn approve_connection(&self, from: AccountId, to: AccountId) -> VnResult<()>;
	/// Approved, symmetric peers of `account_id`
	async fn network_of(&self, account_id: AccountId) -> VnResult<Vec<AccountId>>;

	/// Asymmetric follow edge, no approval involved
	async fn add_follow(&self, follower: AccountId, target: AccountId) -> VnResult<()>;
	async fn followed_of(&self, follower: AccountId) -> VnResult<Vec<AccountId>>;

	async fn add_member(
		&self,
		community_id: AccountId,
		member_id: AccountId,
		is_manager: bool,
	) -> VnResult<()>;
	async fn remove_member(&self, community_id: AccountId, member_id: AccountId) -> VnResult<()>;
	async fn communities_of(&self, member_id: AccountId) -> VnResult<Vec<AccountId>>;
	async fn members_of(&self, community_id: AccountId) -> VnResult<Vec<AccountId>>;
	async fn is_member(&self, community_id: AccountId, member_id: AccountId) -> VnResult<bool>;
	async fn member_count(&self, community_id: AccountId) -> VnResult<u32>;

	// Content management
	//********************
	async fn create_content(&self, data: &CreateContent<'_>) -> VnResult<ContentId>;
	async fn read_content(&self, content_id: ContentId) -> VnResult<Content>;
	/// Replace body, template name and mapping rows atomically
	async fn update_content(&self, content_id: ContentId, data: &UpdateContent<'_>) -> VnResult<()>;
	async fn delete_content(&self, content_id: ContentId) -> VnResult<()>;
	async fn list_content(&self, filter: &ContentFilter) -> VnResult<Vec<Content>>;
	/// Counts exactly the rows `list_content` returns for the same filter,
	/// duplicates included unless the filter sets `distinct`
	async fn count_content(&self, filter: &ContentFilter) -> VnResult<u32>;
	async fn content_permission_detail(&self, content_id: ContentId)
		-> VnResult<Vec<PermissionGrant>>;
}

// vim: ts=4
