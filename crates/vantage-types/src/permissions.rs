//! Permission names and the static template registries.
//!
//! A template is a named bundle mapping each permission to the minimal role
//! required for it. Two registries exist: one for content, one for accounts
//! and communities. Templates are static configuration data; resolving an
//! unknown template name is a code/data mismatch and therefore fatal.

use serde::{Deserialize, Serialize};

use crate::error::{Error, VnResult};
use crate::roles::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
	CanView,
	CanList,
	CanEdit,
	CanDelete,
	CanPublish,
	CanJoin,
}

pub const ALL_PERMISSIONS: [Permission; 6] = [
	Permission::CanView,
	Permission::CanList,
	Permission::CanEdit,
	Permission::CanDelete,
	Permission::CanPublish,
	Permission::CanJoin,
];

impl Permission {
	/// Stable storage code
	pub fn code(self) -> &'static str {
		match self {
			Permission::CanView => "can_view",
			Permission::CanList => "can_list",
			Permission::CanEdit => "can_edit",
			Permission::CanDelete => "can_delete",
			Permission::CanPublish => "can_publish",
			Permission::CanJoin => "can_join",
		}
	}

	pub fn from_code(code: &str) -> VnResult<Self> {
		ALL_PERMISSIONS
			.into_iter()
			.find(|perm| perm.code() == code)
			.ok_or_else(|| Error::Integrity(format!("unknown permission code '{}'", code).into()))
	}
}

impl std::fmt::Display for Permission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// A single materialized mapping row: `permission` is granted to `role` and
/// every role that implies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
	pub permission: Permission,
	pub role: Role,
}

pub struct Template {
	pub name: &'static str,
	pub label: &'static str,
	grants: &'static [(Permission, Role)],
}

pub struct TemplateRegistry {
	templates: &'static [Template],
	default: &'static str,
}

impl TemplateRegistry {
	/// Ordered (template name, display label) pairs for selection UIs
	pub fn get_choices(&self) -> Vec<(&'static str, &'static str)> {
		self.templates.iter().map(|t| (t.name, t.label)).collect()
	}

	pub fn get_default(&self) -> &'static str {
		self.default
	}

	fn template(&self, name: &str) -> VnResult<&Template> {
		self.templates
			.iter()
			.find(|t| t.name == name)
			.ok_or_else(|| Error::Config(format!("unknown permission template '{}'", name).into()))
	}

	/// Minimal role required for `permission` under `template_name`, or
	/// `None` when the template does not grant the permission at all.
	pub fn resolve(&self, template_name: &str, permission: Permission) -> VnResult<Option<Role>> {
		let template = self.template(template_name)?;
		Ok(template
			.grants
			.iter()
			.find(|(perm, _)| *perm == permission)
			.map(|(_, role)| *role))
	}

	/// All mapping rows defined by `template_name`, ready to be materialized
	pub fn resolve_all(&self, template_name: &str) -> VnResult<Vec<PermissionGrant>> {
		let template = self.template(template_name)?;
		Ok(template
			.grants
			.iter()
			.map(|&(permission, role)| PermissionGrant { permission, role })
			.collect())
	}
}

static CONTENT_TEMPLATES: TemplateRegistry = TemplateRegistry {
	default: "network",
	templates: &[
		Template {
			name: "private",
			label: "Private (only me)",
			grants: &[
				(Permission::CanView, Role::ContentAuthor),
				(Permission::CanList, Role::ContentAuthor),
				(Permission::CanEdit, Role::ContentAuthor),
				(Permission::CanDelete, Role::ContentAuthor),
			],
		},
		Template {
			name: "network",
			label: "My network",
			grants: &[
				(Permission::CanView, Role::ContentNetwork),
				(Permission::CanList, Role::ContentNetwork),
				(Permission::CanEdit, Role::ContentAuthor),
				(Permission::CanDelete, Role::ContentAuthor),
			],
		},
		Template {
			name: "public",
			label: "Everyone",
			grants: &[
				(Permission::CanView, Role::ContentPublic),
				(Permission::CanList, Role::ContentPublic),
				(Permission::CanEdit, Role::ContentAuthor),
				(Permission::CanDelete, Role::ContentAuthor),
			],
		},
	],
};

static ACCOUNT_TEMPLATES: TemplateRegistry = TemplateRegistry {
	default: "public",
	templates: &[
		Template {
			name: "private",
			label: "Private account",
			grants: &[
				(Permission::CanView, Role::AccountNetwork),
				(Permission::CanList, Role::AccountNetwork),
				(Permission::CanPublish, Role::Owner),
			],
		},
		Template {
			name: "network",
			label: "Visible to my network",
			grants: &[
				(Permission::CanView, Role::AccountNetwork),
				(Permission::CanList, Role::Authenticated),
				(Permission::CanPublish, Role::Owner),
			],
		},
		Template {
			name: "public",
			label: "Public account",
			grants: &[
				(Permission::CanView, Role::Authenticated),
				(Permission::CanList, Role::Authenticated),
				(Permission::CanPublish, Role::Owner),
			],
		},
		Template {
			name: "members",
			label: "Members-only community",
			grants: &[
				(Permission::CanView, Role::CommunityMember),
				(Permission::CanList, Role::Authenticated),
				(Permission::CanPublish, Role::CommunityMember),
				(Permission::CanJoin, Role::CommunityManager),
			],
		},
		Template {
			name: "intranet",
			label: "Intranet community",
			grants: &[
				(Permission::CanView, Role::Authenticated),
				(Permission::CanList, Role::Authenticated),
				(Permission::CanPublish, Role::CommunityMember),
				(Permission::CanJoin, Role::Authenticated),
			],
		},
		Template {
			name: "internet",
			label: "Internet community",
			grants: &[
				(Permission::CanView, Role::Anonymous),
				(Permission::CanList, Role::Anonymous),
				(Permission::CanPublish, Role::CommunityMember),
				(Permission::CanJoin, Role::Authenticated),
			],
		},
	],
};

/// Registry for content-like objects
pub fn content_templates() -> &'static TemplateRegistry {
	&CONTENT_TEMPLATES
}

/// Registry for accounts and communities
pub fn account_templates() -> &'static TemplateRegistry {
	&ACCOUNT_TEMPLATES
}


// vim: ts=4
