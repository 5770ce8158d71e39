//! Content lifecycle: create, edit, delete.
//!
//! Saving resolves the content's permission template into mapping rows and
//! hands them to the adapter together with the row itself, so the mapping is
//! replaced in the same transaction and never observed half-written.

use crate::evaluator::{has_account_permission, has_permission, verify_system_invariant};
use crate::prelude::*;
use vantage_types::meta_adapter::{CreateContent, UpdateContent};
use vantage_types::permissions::{content_templates, Permission};
use vantage_types::types::{AccountType, Content, ContentBody};

#[derive(Debug)]
pub struct CreateContentRequest {
	pub body: ContentBody,
	/// Defaults to the author
	pub publisher: Option<AccountId>,
	/// Content template name; defaults to the registry default
	pub permissions: Option<Box<str>>,
	pub translation_of: Option<ContentId>,
	pub attachments: Option<Box<[Box<str>]>>,
}

impl CreateContentRequest {
	pub fn new(body: ContentBody) -> Self {
		Self {
			body,
			publisher: None,
			permissions: None,
			translation_of: None,
			attachments: None,
		}
	}
}

#[derive(Debug)]
pub struct UpdateContentRequest {
	pub body: ContentBody,
	/// Template name; `None` keeps the current one
	pub permissions: Option<Box<str>>,
	pub attachments: Option<Box<[Box<str>]>>,
}

/// Create a content row on behalf of the bound viewer.
///
/// The author is the viewer; the publisher defaults to the author and must
/// grant `can_publish` to the viewer when it differs.
pub async fn create_content(
	app: &App,
	viewer: &ViewerCtx,
	req: CreateContentRequest,
) -> VnResult<Content> {
	let Some(author) = viewer.get() else {
		return Err(Error::PermissionDenied("cannot save content anonymously".into()));
	};

	let publisher_id = req.publisher.unwrap_or(author.account_id);
	let publisher = app.meta_adapter.read_account(publisher_id).await?;
	if !has_account_permission(app, viewer, Permission::CanPublish, &publisher).await? {
		warn!(
			author = %author.account_id,
			publisher = %publisher_id,
			"publish denied"
		);
		return Err(Error::PermissionDenied(
			format!("{} can't publish on {}", author.name, publisher.name).into(),
		));
	}

	let registry = content_templates();
	let template = req.permissions.as_deref().unwrap_or_else(|| registry.get_default());
	let grants = registry.resolve_all(template)?;

	let content_id = app
		.meta_adapter
		.create_content(&CreateContent {
			body: &req.body,
			author: author.account_id,
			publisher: publisher_id,
			permissions: template,
			translation_of: req.translation_of,
			attachments: req.attachments.as_deref(),
			grants,
		})
		.await?;

	info!(
		content = %content_id,
		author = %author.account_id,
		publisher = %publisher_id,
		template = template,
		"content created"
	);
	app.meta_adapter.read_content(content_id).await
}

/// Update an existing content row. Only the author (or the system account)
/// may edit; the content kind is fixed at creation.
pub async fn update_content(
	app: &App,
	viewer: &ViewerCtx,
	content_id: ContentId,
	req: UpdateContentRequest,
) -> VnResult<Content> {
	let Some(account) = viewer.get() else {
		return Err(Error::PermissionDenied("cannot save content anonymously".into()));
	};

	let existing = app.meta_adapter.read_content(content_id).await?;
	if account.typ == AccountType::System {
		verify_system_invariant(app).await?;
	} else if existing.author != account.account_id {
		return Err(Error::PermissionDenied("not allowed to edit this content".into()));
	}

	if req.body.kind() != existing.kind {
		return Err(Error::Config(
			format!(
				"content kind is fixed at creation ({} != {})",
				req.body.kind().code(),
				existing.kind.code()
			)
			.into(),
		));
	}

	let registry = content_templates();
	let template = req.permissions.as_deref().unwrap_or(existing.permissions.as_ref());
	let grants = registry.resolve_all(template)?;

	app.meta_adapter
		.update_content(
			content_id,
			&UpdateContent {
				body: &req.body,
				permissions: template,
				attachments: req.attachments.as_deref(),
				grants,
			},
		)
		.await?;

	app.meta_adapter.read_content(content_id).await
}

/// Delete a content row after checking `can_delete`.
///
/// Denial is a recoverable, caller-visible condition; the row stays
/// queryable.
pub async fn delete_content(app: &App, viewer: &ViewerCtx, content_id: ContentId) -> VnResult<()> {
	let content = app.meta_adapter.read_content(content_id).await?;
	if !has_permission(app, viewer, Permission::CanDelete, &content).await? {
		return Err(Error::PermissionDenied("not allowed to delete this content".into()));
	}
	app.meta_adapter.delete_content(content_id).await?;
	info!(content = %content_id, "content deleted");
	Ok(())
}

// vim: ts=4
