//! Authorization evaluator.
//!
//! Both enforcement paths are fed by one clause builder: `view_clauses`
//! produces the disjunction used verbatim by the bulk filter and re-evaluated
//! row-by-row for single-object checks, so the two paths read the same
//! materialized mapping rows and cannot drift.

use crate::prelude::*;
use vantage_types::meta_adapter::{ContentFilter, FollowScope, GrantClause, ViewClause};
use vantage_types::permissions::{Permission, PermissionGrant};
use vantage_types::roles::Role;
use vantage_types::types::{Account, AccountType, Content};

/// The viewer's position in the social graph, loaded once per evaluation
#[derive(Clone, Debug)]
pub(crate) struct Relationships {
	pub viewer: AccountId,
	pub network: Vec<AccountId>,
	pub communities: Vec<AccountId>,
	/// Communities the viewer manages. Manager membership semantics are an
	/// unresolved product question; this stays empty so the manager clause
	/// matches nothing.
	pub managed_communities: Vec<AccountId>,
}

pub(crate) async fn load_relationships(app: &App, viewer: AccountId) -> VnResult<Relationships> {
	Ok(Relationships {
		viewer,
		network: app.meta_adapter.network_of(viewer).await?,
		communities: app.meta_adapter.communities_of(viewer).await?,
		managed_communities: Vec::new(),
	})
}

/// The five-clause visibility disjunction for an authenticated viewer.
///
/// Each grant clause pairs an object-level grant of `object_permission` with
/// a publisher-level `can_view` grant at a matching-or-weaker role.
pub(crate) fn view_clauses(rel: &Relationships, object_permission: Permission) -> Vec<ViewClause> {
	vec![
		// Public stuff, ie. stuff I can view if I can view the publisher
		ViewClause::Grant(GrantClause {
			publisher_in: None,
			object_permission,
			object_roles: Role::ContentPublic.implied(),
			publisher_permission: Permission::CanView,
			publisher_roles: Role::Authenticated.implied(),
		}),
		// Stuff from the people in my network
		ViewClause::Grant(GrantClause {
			publisher_in: Some(rel.network.clone()),
			object_permission,
			object_roles: Role::ContentNetwork.implied(),
			publisher_permission: Permission::CanView,
			publisher_roles: Role::AccountNetwork.implied(),
		}),
		// Stuff from the communities I'm in
		ViewClause::Grant(GrantClause {
			publisher_in: Some(rel.communities.clone()),
			object_permission,
			object_roles: Role::ContentCommunityMember.implied(),
			publisher_permission: Permission::CanView,
			publisher_roles: Role::CommunityMember.implied(),
		}),
		// Stuff from the communities I manage
		ViewClause::Grant(GrantClause {
			publisher_in: Some(rel.managed_communities.clone()),
			object_permission,
			object_roles: Role::ContentCommunityManager.implied(),
			publisher_permission: Permission::CanView,
			publisher_roles: Role::CommunityManager.implied(),
		}),
		// And, of course, what I wrote
		ViewClause::AuthoredBy(rel.viewer),
	]
}

/// The single clause an anonymous viewer gets once the internet gate is open
fn anonymous_clause(object_permission: Permission) -> ViewClause {
	ViewClause::Grant(GrantClause {
		publisher_in: None,
		object_permission,
		object_roles: Role::ContentPublic.implied(),
		publisher_permission: Permission::CanView,
		publisher_roles: vec![Role::Anonymous],
	})
}

/// Anonymous-mode gate: anonymous queries are only served when the global
/// community is in internet mode. Checked before any clause evaluation so a
/// mis-seeded deployment exposes nothing.
pub async fn anonymous_gate(app: &App) -> VnResult<bool> {
	let globals = app.meta_adapter.list_accounts_of_type(AccountType::GlobalCommunity).await?;
	Ok(globals.iter().any(|account| account.permissions.as_ref() == "internet"))
}

/// Confirm the single-SystemAccount invariant holds in storage before
/// honoring a system bypass.
pub async fn verify_system_invariant(app: &App) -> VnResult<()> {
	let count = app.meta_adapter.count_accounts_of_type(AccountType::System).await?;
	if count != 1 {
		return Err(Error::Config(
			format!("expected exactly one system account, found {}", count).into(),
		));
	}
	Ok(())
}

/// Compile the bulk visibility predicate for `viewer`.
///
/// The returned filter does not deduplicate results; callers that need
/// uniqueness must set `distinct` on it explicitly.
pub async fn view_filter(app: &App, viewer: &ViewerCtx) -> VnResult<ContentFilter> {
	match viewer.get() {
		None => {
			if !anonymous_gate(app).await? {
				return Ok(ContentFilter::none());
			}
			Ok(ContentFilter {
				clauses: vec![anonymous_clause(Permission::CanView)],
				..ContentFilter::default()
			})
		}
		Some(account) if account.typ == AccountType::System => {
			verify_system_invariant(app).await?;
			Ok(ContentFilter::all())
		}
		Some(account) => {
			let rel = load_relationships(app, account.account_id).await?;
			Ok(ContentFilter {
				clauses: view_clauses(&rel, Permission::CanView),
				..ContentFilter::default()
			})
		}
	}
}

/// Everything `viewer` is authorized to read
pub async fn viewable_by(app: &App, viewer: &ViewerCtx) -> VnResult<Vec<Content>> {
	let filter = view_filter(app, viewer).await?;
	app.meta_adapter.list_content(&filter).await
}

/// Viewable content restricted to publishers the viewer follows, the viewer's
/// own wall, and the viewer's own writing
pub async fn followed_by(app: &App, viewer: &ViewerCtx) -> VnResult<Vec<Content>> {
	let Some(account) = viewer.get() else {
		// anonymous viewers follow nothing
		return Ok(Vec::new());
	};
	let mut filter = view_filter(app, viewer).await?;
	let mut publisher_in = app.meta_adapter.followed_of(account.account_id).await?;
	publisher_in.push(account.account_id);
	filter.scope = Some(FollowScope { publisher_in, author: account.account_id });
	app.meta_adapter.list_content(&filter).await
}

/// Single-object permission check.
///
/// Content checks are two-hop: the object's own mapping must grant
/// `permission`, and the publisher's mapping must grant `can_view`, at roles
/// the viewer's relationship to the publisher reaches.
pub async fn has_permission(
	app: &App,
	viewer: &ViewerCtx,
	permission: Permission,
	content: &Content,
) -> VnResult<bool> {
	match viewer.get() {
		Some(account) if account.typ == AccountType::System => {
			verify_system_invariant(app).await?;
			Ok(true)
		}
		None => {
			if !anonymous_gate(app).await? {
				return Ok(false);
			}
			let object_rows =
				app.meta_adapter.content_permission_detail(content.content_id).await?;
			let publisher_rows =
				app.meta_adapter.account_permission_detail(content.publisher).await?;
			Ok(clause_matches(
				&anonymous_clause(permission),
				content,
				&object_rows,
				&publisher_rows,
			))
		}
		Some(account) => {
			if content.author == account.account_id {
				return Ok(true);
			}
			let rel = load_relationships(app, account.account_id).await?;
			let object_rows =
				app.meta_adapter.content_permission_detail(content.content_id).await?;
			let publisher_rows =
				app.meta_adapter.account_permission_detail(content.publisher).await?;
			let allowed = view_clauses(&rel, permission)
				.iter()
				.any(|clause| clause_matches(clause, content, &object_rows, &publisher_rows));
			if !allowed {
				debug!(
					viewer = %account.account_id,
					permission = %permission,
					content = %content.content_id,
					publisher = %content.publisher,
					"permission check failed"
				);
			}
			Ok(allowed)
		}
	}
}

/// Account-side permission check (`can_publish`, `can_join`, account
/// `can_view`). The owner and the system account always pass.
pub async fn has_account_permission(
	app: &App,
	viewer: &ViewerCtx,
	permission: Permission,
	target: &Account,
) -> VnResult<bool> {
	match viewer.get() {
		Some(account) if account.typ == AccountType::System => {
			verify_system_invariant(app).await?;
			Ok(true)
		}
		None => {
			if !anonymous_gate(app).await? {
				return Ok(false);
			}
			let rows = app.meta_adapter.account_permission_detail(target.account_id).await?;
			Ok(rows
				.iter()
				.any(|row| row.permission == permission && row.role == Role::Anonymous))
		}
		Some(account) => {
			if account.account_id == target.account_id {
				return Ok(true);
			}
			let mut held = vec![Role::Authenticated];
			let network = app.meta_adapter.network_of(account.account_id).await?;
			if network.contains(&target.account_id) {
				held.push(Role::AccountNetwork);
			}
			if target.typ.is_community()
				&& app.meta_adapter.is_member(target.account_id, account.account_id).await?
			{
				held.push(Role::CommunityMember);
			}
			let rows = app.meta_adapter.account_permission_detail(target.account_id).await?;
			Ok(rows.iter().any(|row| {
				row.permission == permission
					&& held.iter().any(|h| h.implied().contains(&row.role))
			}))
		}
	}
}

/// Evaluate one clause of the disjunction against a single content row and
/// its materialized mapping rows, with the same semantics the adapter
/// executes in SQL for the bulk path.
fn clause_matches(
	clause: &ViewClause,
	content: &Content,
	object_rows: &[PermissionGrant],
	publisher_rows: &[PermissionGrant],
) -> bool {
	match clause {
		ViewClause::AuthoredBy(author) => content.author == *author,
		ViewClause::Grant(grant) => {
			if let Some(publishers) = &grant.publisher_in {
				if !publishers.contains(&content.publisher) {
					return false;
				}
			}
			let object_ok = object_rows.iter().any(|row| {
				row.permission == grant.object_permission
					&& grant.object_roles.contains(&row.role)
			});
			let publisher_ok = publisher_rows.iter().any(|row| {
				row.permission == grant.publisher_permission
					&& grant.publisher_roles.contains(&row.role)
			});
			object_ok && publisher_ok
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vantage_types::types::{now, ContentBody, ContentKind};

	fn relationships() -> Relationships {
		Relationships {
			viewer: AccountId(1),
			network: vec![AccountId(2)],
			communities: vec![AccountId(10)],
			managed_communities: Vec::new(),
		}
	}

	fn content(author: i64, publisher: i64) -> Content {
		Content {
			content_id: ContentId(100),
			kind: ContentKind::StatusUpdate,
			body: ContentBody::StatusUpdate { text: "Hello, World!".into() },
			author: AccountId(author),
			publisher: AccountId(publisher),
			permissions: "network".into(),
			translation_of: None,
			attachments: None,
			created_at: now(),
		}
	}

	fn grant(permission: Permission, role: Role) -> PermissionGrant {
		PermissionGrant { permission, role }
	}

	#[test]
	fn test_clause_builder_shape() {
		let clauses = view_clauses(&relationships(), Permission::CanView);
		assert_eq!(clauses.len(), 5);
		assert_eq!(clauses[4], ViewClause::AuthoredBy(AccountId(1)));
		// the public clause is unrestricted by publisher
		match &clauses[0] {
			ViewClause::Grant(g) => assert!(g.publisher_in.is_none()),
			ViewClause::AuthoredBy(_) => unreachable!(),
		}
	}

	#[test]
	fn test_manager_clause_matches_nothing() {
		let clauses = view_clauses(&relationships(), Permission::CanView);
		let ViewClause::Grant(manager) = &clauses[3] else { unreachable!() };
		assert_eq!(manager.publisher_in.as_deref(), Some(&[][..]));
		assert!(!clause_matches(
			&clauses[3],
			&content(2, 2),
			&[grant(Permission::CanView, Role::ContentCommunityManager)],
			&[grant(Permission::CanView, Role::CommunityManager)],
		));
	}

	#[test]
	fn test_network_clause_requires_network_publisher() {
		let clauses = view_clauses(&relationships(), Permission::CanView);
		let object_rows = [grant(Permission::CanView, Role::ContentNetwork)];
		let publisher_rows = [grant(Permission::CanView, Role::AccountNetwork)];
		// publisher 2 is in the network
		assert!(clause_matches(&clauses[1], &content(2, 2), &object_rows, &publisher_rows));
		// publisher 3 is not
		assert!(!clause_matches(&clauses[1], &content(3, 3), &object_rows, &publisher_rows));
	}

	#[test]
	fn test_private_rows_match_no_grant_clause() {
		let clauses = view_clauses(&relationships(), Permission::CanView);
		let object_rows = [grant(Permission::CanView, Role::ContentAuthor)];
		let publisher_rows = [grant(Permission::CanView, Role::Authenticated)];
		for clause in &clauses[..4] {
			assert!(!clause_matches(clause, &content(2, 2), &object_rows, &publisher_rows));
		}
		// but the author clause still matches for the author
		assert!(clause_matches(&clauses[4], &content(1, 1), &object_rows, &publisher_rows));
	}

	#[test]
	fn test_public_clause_accepts_public_rows_only() {
		let clauses = view_clauses(&relationships(), Permission::CanView);
		let publisher_rows = [grant(Permission::CanView, Role::Authenticated)];
		assert!(clause_matches(
			&clauses[0],
			&content(5, 5),
			&[grant(Permission::CanView, Role::ContentPublic)],
			&publisher_rows,
		));
		// network-scoped rows must not leak through the public clause
		assert!(!clause_matches(
			&clauses[0],
			&content(5, 5),
			&[grant(Permission::CanView, Role::ContentNetwork)],
			&publisher_rows,
		));
	}

	#[test]
	fn test_anonymous_clause_requires_anonymous_publisher_grant() {
		let clause = anonymous_clause(Permission::CanView);
		let object_rows = [grant(Permission::CanView, Role::ContentPublic)];
		assert!(clause_matches(
			&clause,
			&content(5, 5),
			&object_rows,
			&[grant(Permission::CanView, Role::Anonymous)],
		));
		// a publisher viewable by authenticated users only stays hidden
		assert!(!clause_matches(
			&clause,
			&content(5, 5),
			&object_rows,
			&[grant(Permission::CanView, Role::Authenticated)],
		));
	}
}

// vim: ts=4
