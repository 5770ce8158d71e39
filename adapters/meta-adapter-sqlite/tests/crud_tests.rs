//! Adapter CRUD tests: accounts, contents, the social graph and the
//! materialized permission mapping.

use tempfile::TempDir;

use vantage::meta_adapter::{
	ContentFilter, CreateAccount, CreateContent, GrantClause, MetaAdapter, UpdateContent,
	ViewClause,
};
use vantage::permissions::{account_templates, content_templates, Permission, PermissionGrant};
use vantage::prelude::*;
use vantage::roles::Role;
use vantage::types::{AccountType, ContentBody, ContentKind};
use vantage_meta_adapter_sqlite::MetaAdapterSqlite;

async fn create_test_adapter() -> (MetaAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path().join("meta.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

async fn create_account(adapter: &MetaAdapterSqlite, name: &str, template: &str) -> AccountId {
	adapter
		.create_account(&CreateAccount {
			name,
			typ: AccountType::User,
			permissions: template,
			grants: account_templates().resolve_all(template).expect("known template"),
		})
		.await
		.expect("Should create account")
}

async fn create_status(adapter: &MetaAdapterSqlite, author: AccountId, template: &str) -> ContentId {
	adapter
		.create_content(&CreateContent {
			body: &ContentBody::StatusUpdate { text: "Hello, World!".into() },
			author,
			publisher: author,
			permissions: template,
			translation_of: None,
			attachments: None,
			grants: content_templates().resolve_all(template).expect("known template"),
		})
		.await
		.expect("Should create content")
}

#[tokio::test]
async fn test_create_and_read_account() {
	let (adapter, _temp) = create_test_adapter().await;

	let account_id = create_account(&adapter, "alice", "public").await;
	let account = adapter.read_account(account_id).await.expect("Should read account");
	assert_eq!(account.name.as_ref(), "alice");
	assert_eq!(account.typ, AccountType::User);
	assert_eq!(account.permissions.as_ref(), "public");

	let by_name = adapter.read_account_by_name("alice").await.expect("Should read by name");
	assert_eq!(by_name.account_id, account_id);
}

#[tokio::test]
async fn test_read_missing_account() {
	let (adapter, _temp) = create_test_adapter().await;

	assert!(matches!(adapter.read_account(AccountId(42)).await, Err(Error::NotFound)));
	assert!(matches!(adapter.read_account_by_name("nobody").await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_account_names_are_unique() {
	let (adapter, _temp) = create_test_adapter().await;

	create_account(&adapter, "alice", "public").await;
	let dup = adapter
		.create_account(&CreateAccount {
			name: "alice",
			typ: AccountType::User,
			permissions: "public",
			grants: Vec::new(),
		})
		.await;
	assert!(dup.is_err(), "Duplicate name should be rejected");
}

#[tokio::test]
async fn test_account_mapping_is_materialized() {
	let (adapter, _temp) = create_test_adapter().await;

	let account_id = create_account(&adapter, "alice", "public").await;
	let rows = adapter.account_permission_detail(account_id).await.expect("Should read mapping");
	assert_eq!(rows.len(), 3);
	assert!(rows.contains(&PermissionGrant {
		permission: Permission::CanView,
		role: Role::Authenticated,
	}));
}

#[tokio::test]
async fn test_update_template_replaces_mapping() {
	let (adapter, _temp) = create_test_adapter().await;

	let account_id = create_account(&adapter, "alice", "public").await;
	let grants = account_templates().resolve_all("private").expect("known template");
	adapter
		.update_account_template(account_id, "private", &grants)
		.await
		.expect("Should update template");

	let account = adapter.read_account(account_id).await.expect("Should read account");
	assert_eq!(account.permissions.as_ref(), "private");

	// old rows are gone, not merged
	let rows = adapter.account_permission_detail(account_id).await.expect("Should read mapping");
	assert_eq!(rows.len(), grants.len());
	assert!(rows.contains(&PermissionGrant {
		permission: Permission::CanView,
		role: Role::AccountNetwork,
	}));
	assert!(!rows.contains(&PermissionGrant {
		permission: Permission::CanView,
		role: Role::Authenticated,
	}));
}

#[tokio::test]
async fn test_update_template_of_missing_account() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter.update_account_template(AccountId(42), "private", &[]).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_and_count_accounts_of_type() {
	let (adapter, _temp) = create_test_adapter().await;

	create_account(&adapter, "alice", "public").await;
	create_account(&adapter, "bob", "public").await;

	let users = adapter
		.list_accounts_of_type(AccountType::User)
		.await
		.expect("Should list accounts");
	assert_eq!(users.len(), 2);
	assert_eq!(
		adapter.count_accounts_of_type(AccountType::User).await.expect("Should count"),
		2
	);
	assert_eq!(
		adapter.count_accounts_of_type(AccountType::Community).await.expect("Should count"),
		0
	);
}

#[tokio::test]
async fn test_create_and_read_content() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let content_id = adapter
		.create_content(&CreateContent {
			body: &ContentBody::Link {
				url: "https://example.com".into(),
				text: "Example".into(),
			},
			author: alice,
			publisher: alice,
			permissions: "network",
			translation_of: None,
			attachments: Some(&["a.png".into(), "b.png".into()]),
			grants: content_templates().resolve_all("network").expect("known template"),
		})
		.await
		.expect("Should create content");

	let content = adapter.read_content(content_id).await.expect("Should read content");
	assert_eq!(content.kind, ContentKind::Link);
	assert_eq!(content.author, alice);
	assert_eq!(content.publisher, alice);
	assert_eq!(content.permissions.as_ref(), "network");
	assert_eq!(content.attachments.as_deref().map(<[Box<str>]>::len), Some(2));
	match &content.body {
		ContentBody::Link { url, text } => {
			assert_eq!(url.as_ref(), "https://example.com");
			assert_eq!(text.as_ref(), "Example");
		}
		other => panic!("unexpected body: {:?}", other),
	}
}

#[tokio::test]
async fn test_empty_attachments_round_trip_as_none() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let content_id = adapter
		.create_content(&CreateContent {
			body: &ContentBody::StatusUpdate { text: "no files".into() },
			author: alice,
			publisher: alice,
			permissions: "network",
			translation_of: None,
			attachments: Some(&[]),
			grants: content_templates().resolve_all("network").expect("known template"),
		})
		.await
		.expect("Should create content");

	let content = adapter.read_content(content_id).await.expect("Should read content");
	assert!(content.attachments.is_none());

	// same on the update path
	adapter
		.update_content(
			content_id,
			&UpdateContent {
				body: &ContentBody::StatusUpdate { text: "still no files".into() },
				permissions: "network",
				attachments: Some(&[]),
				grants: content_templates().resolve_all("network").expect("known template"),
			},
		)
		.await
		.expect("Should update content");
	let content = adapter.read_content(content_id).await.expect("Should read content");
	assert!(content.attachments.is_none());
}

#[tokio::test]
async fn test_update_content_replaces_mapping() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let content_id = create_status(&adapter, alice, "network").await;

	adapter
		.update_content(
			content_id,
			&UpdateContent {
				body: &ContentBody::StatusUpdate { text: "edited".into() },
				permissions: "private",
				attachments: None,
				grants: content_templates().resolve_all("private").expect("known template"),
			},
		)
		.await
		.expect("Should update content");

	let content = adapter.read_content(content_id).await.expect("Should read content");
	assert_eq!(content.body.text(), "edited");
	assert_eq!(content.permissions.as_ref(), "private");

	let rows = adapter.content_permission_detail(content_id).await.expect("Should read mapping");
	assert!(rows.contains(&PermissionGrant {
		permission: Permission::CanView,
		role: Role::ContentAuthor,
	}));
	assert!(!rows.contains(&PermissionGrant {
		permission: Permission::CanView,
		role: Role::ContentNetwork,
	}));
}

#[tokio::test]
async fn test_update_content_rejects_kind_change() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let content_id = create_status(&adapter, alice, "network").await;

	let res = adapter
		.update_content(
			content_id,
			&UpdateContent {
				body: &ContentBody::Link {
					url: "https://example.com".into(),
					text: "link".into(),
				},
				permissions: "network",
				attachments: None,
				grants: Vec::new(),
			},
		)
		.await;
	assert!(matches!(res, Err(Error::NotFound)));

	// the row is untouched
	let content = adapter.read_content(content_id).await.expect("Should read content");
	assert_eq!(content.kind, ContentKind::StatusUpdate);
}

#[tokio::test]
async fn test_delete_content_removes_row_and_mapping() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let content_id = create_status(&adapter, alice, "network").await;

	adapter.delete_content(content_id).await.expect("Should delete content");
	assert!(matches!(adapter.read_content(content_id).await, Err(Error::NotFound)));
	let rows = adapter.content_permission_detail(content_id).await.expect("Should read mapping");
	assert!(rows.is_empty());

	assert!(matches!(adapter.delete_content(content_id).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_connection_approval_is_symmetric() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let bob = create_account(&adapter, "bob", "public").await;

	adapter.create_connection_request(alice, bob).await.expect("Should create request");
	// pending requests are not part of either network
	assert!(adapter.network_of(alice).await.expect("Should list network").is_empty());
	assert!(adapter.network_of(bob).await.expect("Should list network").is_empty());

	adapter.approve_connection(alice, bob).await.expect("Should approve");
	assert_eq!(adapter.network_of(alice).await.expect("Should list network"), vec![bob]);
	assert_eq!(adapter.network_of(bob).await.expect("Should list network"), vec![alice]);

	// nothing left to approve
	assert!(matches!(adapter.approve_connection(alice, bob).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_membership_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;

	let community = adapter
		.create_account(&CreateAccount {
			name: "devs",
			typ: AccountType::Community,
			permissions: "members",
			grants: account_templates().resolve_all("members").expect("known template"),
		})
		.await
		.expect("Should create community");
	let alice = create_account(&adapter, "alice", "public").await;

	adapter.add_member(community, alice, false).await.expect("Should add member");
	adapter.add_member(community, alice, false).await.expect("Should tolerate rejoin");
	assert_eq!(adapter.member_count(community).await.expect("Should count"), 1);
	assert!(adapter.is_member(community, alice).await.expect("Should check membership"));
	assert_eq!(adapter.members_of(community).await.expect("Should list members"), vec![alice]);
	assert_eq!(
		adapter.communities_of(alice).await.expect("Should list communities"),
		vec![community]
	);

	adapter.remove_member(community, alice).await.expect("Should remove member");
	assert_eq!(adapter.member_count(community).await.expect("Should count"), 0);
}

#[tokio::test]
async fn test_follow_edges() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let bob = create_account(&adapter, "bob", "public").await;

	adapter.add_follow(bob, alice).await.expect("Should follow");
	adapter.add_follow(bob, alice).await.expect("Should tolerate refollow");
	assert_eq!(adapter.followed_of(bob).await.expect("Should list followed"), vec![alice]);
	// follows are asymmetric
	assert!(adapter.followed_of(alice).await.expect("Should list followed").is_empty());
}

#[tokio::test]
async fn test_filter_all_and_none() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	create_status(&adapter, alice, "private").await;
	create_status(&adapter, alice, "public").await;

	let all = adapter.list_content(&ContentFilter::all()).await.expect("Should list content");
	assert_eq!(all.len(), 2);
	assert_eq!(adapter.count_content(&ContentFilter::all()).await.expect("Should count"), 2);

	let none = adapter.list_content(&ContentFilter::none()).await.expect("Should list content");
	assert!(none.is_empty());
	assert_eq!(adapter.count_content(&ContentFilter::none()).await.expect("Should count"), 0);
}

#[tokio::test]
async fn test_filter_authored_by_clause() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let bob = create_account(&adapter, "bob", "public").await;
	let mine = create_status(&adapter, alice, "private").await;
	create_status(&adapter, bob, "private").await;

	let filter = ContentFilter {
		clauses: vec![ViewClause::AuthoredBy(alice)],
		..ContentFilter::default()
	};
	// the mapping joins can repeat the row; only bob's content must be absent
	let visible = adapter.list_content(&filter).await.expect("Should list content");
	assert!(!visible.is_empty());
	assert!(visible.iter().all(|content| content.content_id == mine));
}

#[tokio::test]
async fn test_filter_duplicates_collapse_with_distinct() {
	let (adapter, _temp) = create_test_adapter().await;

	let alice = create_account(&adapter, "alice", "public").await;
	let announce = create_status(&adapter, alice, "public").await;

	// a grant clause and the author clause both reach the same row, and the
	// mapping joins multiply the matches further
	let filter = ContentFilter {
		clauses: vec![
			ViewClause::Grant(GrantClause {
				publisher_in: None,
				object_permission: Permission::CanView,
				object_roles: vec![Role::ContentPublic],
				publisher_permission: Permission::CanView,
				publisher_roles: vec![Role::Authenticated],
			}),
			ViewClause::AuthoredBy(alice),
		],
		..ContentFilter::default()
	};

	let rows = adapter.list_content(&filter).await.expect("Should list content");
	assert!(rows.len() > 1, "the mapping joins should duplicate the row");
	assert!(rows.iter().all(|content| content.content_id == announce));
	// count agrees with the undeduplicated listing
	assert_eq!(
		adapter.count_content(&filter).await.expect("Should count"),
		rows.len() as u32
	);

	let distinct = ContentFilter { distinct: true, ..filter };
	let rows = adapter.list_content(&distinct).await.expect("Should list content");
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].content_id, announce);
	assert_eq!(adapter.count_content(&distinct).await.expect("Should count"), 1);
}

// vim: ts=4
