//! Bootstrap: hierarchy validation and the seed accounts.
//!
//! A deployment is only trustworthy once exactly one system account, one
//! global community and one admin community exist. `bootstrap` seeds them
//! idempotently; `verify_seed` re-checks the invariants.

use crate::prelude::*;
use vantage_types::meta_adapter::CreateAccount;
use vantage_types::permissions::account_templates;
use vantage_types::roles::validate_hierarchy;
use vantage_types::types::{Account, AccountType};

/// Default template for the global community: intranet, so anonymous viewers
/// see nothing until an operator switches to internet mode deliberately.
const GLOBAL_COMMUNITY_TEMPLATE: &str = "intranet";
const ADMIN_COMMUNITY_TEMPLATE: &str = "members";
const SYSTEM_ACCOUNT_TEMPLATE: &str = "private";

pub struct Seed {
	pub system: Account,
	pub global: Account,
	pub admin: Account,
}

/// Seed the store. Idempotent: existing singleton rows are returned as-is,
/// duplicates are a fatal configuration error.
pub async fn bootstrap(app: &App) -> VnResult<Seed> {
	// fail fast before anything touches the mapping store
	validate_hierarchy()?;

	let system =
		ensure_singleton(app, AccountType::System, "system", SYSTEM_ACCOUNT_TEMPLATE).await?;
	let global = ensure_singleton(
		app,
		AccountType::GlobalCommunity,
		"global",
		GLOBAL_COMMUNITY_TEMPLATE,
	)
	.await?;
	let admin = ensure_singleton(
		app,
		AccountType::AdminCommunity,
		"administrators",
		ADMIN_COMMUNITY_TEMPLATE,
	)
	.await?;

	// the system account administers the platform
	app.meta_adapter.add_member(admin.account_id, system.account_id, true).await?;

	verify_seed(app).await?;
	info!(
		system = %system.account_id,
		global = %global.account_id,
		admin = %admin.account_id,
		"bootstrap complete"
	);
	Ok(Seed { system, global, admin })
}

async fn ensure_singleton(
	app: &App,
	typ: AccountType,
	name: &str,
	template: &str,
) -> VnResult<Account> {
	let existing = app.meta_adapter.list_accounts_of_type(typ).await?;
	match existing.len() {
		0 => {
			let grants = account_templates().resolve_all(template)?;
			let account_id = app
				.meta_adapter
				.create_account(&CreateAccount { name, typ, permissions: template, grants })
				.await?;
			info!(account = %account_id, name = name, typ = ?typ, "seed account created");
			app.meta_adapter.read_account(account_id).await
		}
		1 => Ok(existing.into_iter().next().ok_or(Error::DbError)?),
		n => Err(Error::Config(
			format!("expected at most one {:?} account, found {}", typ, n).into(),
		)),
	}
}

/// Re-check the exactly-one invariants for the three seed accounts
pub async fn verify_seed(app: &App) -> VnResult<()> {
	for typ in
		[AccountType::System, AccountType::GlobalCommunity, AccountType::AdminCommunity]
	{
		let count = app.meta_adapter.count_accounts_of_type(typ).await?;
		if count != 1 {
			return Err(Error::Config(
				format!("expected exactly one {:?} account, found {}", typ, count).into(),
			));
		}
	}
	Ok(())
}

// vim: ts=4
