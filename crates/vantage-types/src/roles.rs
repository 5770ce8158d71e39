//! Role hierarchy.
//!
//! Roles form two chains, one for the relationship a viewer holds towards an
//! account and one mirroring it on the content side. Holding a role satisfies
//! every weaker role along its chain: `implied(role)` is the set of stored
//! mapping roles a check at `role`'s level accepts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, VnResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	// account side
	Anonymous,
	Authenticated,
	AccountNetwork,
	CommunityMember,
	CommunityManager,
	Owner,
	System,
	// content side
	ContentPublic,
	ContentNetwork,
	ContentCommunityMember,
	ContentCommunityManager,
	ContentAuthor,
}

pub const ALL_ROLES: [Role; 12] = [
	Role::Anonymous,
	Role::Authenticated,
	Role::AccountNetwork,
	Role::CommunityMember,
	Role::CommunityManager,
	Role::Owner,
	Role::System,
	Role::ContentPublic,
	Role::ContentNetwork,
	Role::ContentCommunityMember,
	Role::ContentCommunityManager,
	Role::ContentAuthor,
];

impl Role {
	/// Stable storage code
	pub fn code(self) -> &'static str {
		match self {
			Role::Anonymous => "anonymous",
			Role::Authenticated => "authenticated",
			Role::AccountNetwork => "account_network",
			Role::CommunityMember => "community_member",
			Role::CommunityManager => "community_manager",
			Role::Owner => "owner",
			Role::System => "system",
			Role::ContentPublic => "content_public",
			Role::ContentNetwork => "content_network",
			Role::ContentCommunityMember => "content_community_member",
			Role::ContentCommunityManager => "content_community_manager",
			Role::ContentAuthor => "content_author",
		}
	}

	pub fn from_code(code: &str) -> VnResult<Self> {
		ALL_ROLES
			.into_iter()
			.find(|role| role.code() == code)
			.ok_or_else(|| Error::Integrity(format!("unknown role code '{}'", code).into()))
	}

	/// The next weaker role along this role's chain, if any.
	///
	/// This table is the entire hierarchy; `implied` and the startup
	/// validation both derive from it.
	pub fn parent(self) -> Option<Role> {
		match self {
			Role::Anonymous => None,
			Role::Authenticated => Some(Role::Anonymous),
			Role::AccountNetwork => Some(Role::Authenticated),
			Role::CommunityMember => Some(Role::AccountNetwork),
			Role::CommunityManager => Some(Role::CommunityMember),
			Role::Owner => Some(Role::CommunityManager),
			Role::System => Some(Role::Owner),
			Role::ContentPublic => None,
			Role::ContentNetwork => Some(Role::ContentPublic),
			Role::ContentCommunityMember => Some(Role::ContentNetwork),
			Role::ContentCommunityManager => Some(Role::ContentCommunityMember),
			Role::ContentAuthor => Some(Role::ContentCommunityManager),
		}
	}

	/// The set of roles this role satisfies: itself plus every transitively
	/// weaker role. Reflexive and transitive by construction.
	pub fn implied(self) -> Vec<Role> {
		let mut implied = Vec::with_capacity(ALL_ROLES.len());
		let mut cursor = Some(self);
		// Bounded walk; the hierarchy is validated acyclic at bootstrap
		for _ in 0..=ALL_ROLES.len() {
			match cursor {
				Some(role) => {
					implied.push(role);
					cursor = role.parent();
				}
				None => break,
			}
		}
		implied
	}
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// Fail fast if the hierarchy contains a cycle. Called at bootstrap before
/// any query is trusted.
pub fn validate_hierarchy() -> VnResult<()> {
	validate_table(Role::parent)
}

pub(crate) fn validate_table(parent: impl Fn(Role) -> Option<Role>) -> VnResult<()> {
	for role in ALL_ROLES {
		let mut cursor = Some(role);
		let mut steps = 0;
		while let Some(current) = cursor {
			steps += 1;
			if steps > ALL_ROLES.len() {
				return Err(Error::Config(
					format!("role hierarchy cycle reachable from '{}'", role).into(),
				));
			}
			cursor = parent(current);
		}
	}
	Ok(())
}


// vim: ts=4
