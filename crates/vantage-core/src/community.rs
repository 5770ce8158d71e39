//! Accounts, communities and the social graph: creation, membership,
//! connections, template switches.

use crate::evaluator::{has_account_permission, verify_system_invariant};
use crate::prelude::*;
use vantage_types::meta_adapter::CreateAccount;
use vantage_types::permissions::{account_templates, Permission};
use vantage_types::types::{Account, AccountType};

fn require_viewer<'a>(viewer: &'a ViewerCtx, action: &str) -> VnResult<&'a Account> {
	viewer.get().ok_or_else(|| {
		Error::PermissionDenied(format!("cannot {} anonymously", action).into())
	})
}

fn is_system(account: &Account) -> bool {
	account.typ == AccountType::System
}

/// Create a user account. Restricted to the system account: registration
/// flows are external collaborators and act through it.
pub async fn create_user(
	app: &App,
	viewer: &ViewerCtx,
	name: &str,
	template: Option<&str>,
) -> VnResult<Account> {
	let actor = require_viewer(viewer, "create an account")?;
	if !is_system(actor) {
		return Err(Error::PermissionDenied("only the system account can create accounts".into()));
	}
	verify_system_invariant(app).await?;

	let registry = account_templates();
	let template = template.unwrap_or_else(|| registry.get_default());
	let grants = registry.resolve_all(template)?;
	let account_id = app
		.meta_adapter
		.create_account(&CreateAccount {
			name,
			typ: AccountType::User,
			permissions: template,
			grants,
		})
		.await?;
	info!(account = %account_id, name = name, "user account created");
	app.meta_adapter.read_account(account_id).await
}

/// Create a regular community. The creator becomes its first member and is
/// recorded with the manager flag.
pub async fn create_community(
	app: &App,
	viewer: &ViewerCtx,
	name: &str,
	template: Option<&str>,
) -> VnResult<Account> {
	let creator = require_viewer(viewer, "create a community")?;

	let registry = account_templates();
	let template = template.unwrap_or("members");
	let grants = registry.resolve_all(template)?;
	let community_id = app
		.meta_adapter
		.create_account(&CreateAccount {
			name,
			typ: AccountType::Community,
			permissions: template,
			grants,
		})
		.await?;

	if !is_system(creator) {
		app.meta_adapter.add_member(community_id, creator.account_id, true).await?;
	}
	info!(community = %community_id, creator = %creator.account_id, name = name, "community created");
	app.meta_adapter.read_account(community_id).await
}

/// Add `account_id` to a community.
///
/// Allowed for the system account, and for an account joining itself when
/// the community's template grants `can_join` at the account's level.
pub async fn join(
	app: &App,
	viewer: &ViewerCtx,
	community_id: AccountId,
	account_id: AccountId,
) -> VnResult<()> {
	let actor = require_viewer(viewer, "join a community")?;
	let community = app.meta_adapter.read_account(community_id).await?;
	if !community.typ.is_community() {
		return Err(Error::ValidationError(
			format!("account {} is not a community", community_id).into(),
		));
	}

	let allowed = if is_system(actor) {
		verify_system_invariant(app).await?;
		true
	} else {
		actor.account_id == account_id
			&& has_account_permission(app, viewer, Permission::CanJoin, &community).await?
	};
	if !allowed {
		warn!(
			actor = %actor.account_id,
			community = %community_id,
			member = %account_id,
			"join denied"
		);
		return Err(Error::PermissionDenied(
			format!("not allowed to join {}", community.name).into(),
		));
	}

	app.meta_adapter.add_member(community_id, account_id, false).await?;
	info!(community = %community_id, member = %account_id, "member joined");
	Ok(())
}

/// Remove `account_id` from a community. The system account or the member
/// itself may leave.
pub async fn leave(
	app: &App,
	viewer: &ViewerCtx,
	community_id: AccountId,
	account_id: AccountId,
) -> VnResult<()> {
	let actor = require_viewer(viewer, "leave a community")?;
	if !is_system(actor) && actor.account_id != account_id {
		return Err(Error::PermissionDenied("not allowed to remove this member".into()));
	}
	app.meta_adapter.remove_member(community_id, account_id).await?;
	info!(community = %community_id, member = %account_id, "member left");
	Ok(())
}

/// Switch an account or community to another permission template.
///
/// The template name and the materialized mapping rows are replaced in one
/// transaction; switching to the value already in place is a no-op with the
/// same end state. Only the account itself or the system account may switch.
pub async fn set_account_template(
	app: &App,
	viewer: &ViewerCtx,
	account_id: AccountId,
	template: &str,
) -> VnResult<Account> {
	let actor = require_viewer(viewer, "change permissions")?;
	if !is_system(actor) && actor.account_id != account_id {
		return Err(Error::PermissionDenied(
			"not allowed to change this account's permissions".into(),
		));
	}

	let grants = account_templates().resolve_all(template)?;
	app.meta_adapter.update_account_template(account_id, template, &grants).await?;
	info!(account = %account_id, template = template, "account template switched");
	app.meta_adapter.read_account(account_id).await
}

/// Request a symmetric network connection with `to`. The edge only becomes
/// part of either network once the other side accepts.
pub async fn request_connection(app: &App, viewer: &ViewerCtx, to: AccountId) -> VnResult<()> {
	let actor = require_viewer(viewer, "request a connection")?;
	if actor.account_id == to {
		return Err(Error::ValidationError("cannot connect an account to itself".into()));
	}
	app.meta_adapter.create_connection_request(actor.account_id, to).await?;
	info!(from = %actor.account_id, to = %to, "connection requested");
	Ok(())
}

/// Accept a pending connection request from `from`; the approved edge is
/// symmetric.
pub async fn accept_connection(app: &App, viewer: &ViewerCtx, from: AccountId) -> VnResult<()> {
	let actor = require_viewer(viewer, "accept a connection")?;
	app.meta_adapter.approve_connection(from, actor.account_id).await?;
	info!(from = %from, to = %actor.account_id, "connection accepted");
	Ok(())
}

/// Follow `target`: asymmetric, no approval. The follow workflow beyond the
/// bare edge is still unsettled product-wise; only the edge write and the
/// `followed_by` read path exist.
pub async fn follow(app: &App, viewer: &ViewerCtx, target: AccountId) -> VnResult<()> {
	let actor = require_viewer(viewer, "follow an account")?;
	app.meta_adapter.add_follow(actor.account_id, target).await?;
	Ok(())
}

/// Current number of members of a community
pub async fn member_count(app: &App, community_id: AccountId) -> VnResult<u32> {
	app.meta_adapter.member_count(community_id).await
}

// vim: ts=4
