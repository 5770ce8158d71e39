//! Common types used throughout the Vantage engine.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::error::{Error, VnResult};

// AccountId //
//***********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub i64);

impl std::fmt::Display for AccountId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for AccountId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for AccountId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(AccountId(i64::deserialize(deserializer)?))
	}
}

// ContentId //
//***********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub i64);

impl std::fmt::Display for ContentId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for ContentId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for ContentId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(ContentId(i64::deserialize(deserializer)?))
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(res.as_secs() as i64)
}

// AccountType //
//*************//
/// Discriminator for account variants. Exactly one `System`, one
/// `GlobalCommunity` and one `AdminCommunity` row may exist in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
	User,
	System,
	Community,
	GlobalCommunity,
	AdminCommunity,
}

impl AccountType {
	/// Stable single-character storage code
	pub fn code(self) -> &'static str {
		match self {
			AccountType::User => "U",
			AccountType::System => "S",
			AccountType::Community => "C",
			AccountType::GlobalCommunity => "G",
			AccountType::AdminCommunity => "A",
		}
	}

	pub fn from_code(code: &str) -> VnResult<Self> {
		match code {
			"U" => Ok(AccountType::User),
			"S" => Ok(AccountType::System),
			"C" => Ok(AccountType::Community),
			"G" => Ok(AccountType::GlobalCommunity),
			"A" => Ok(AccountType::AdminCommunity),
			other => Err(Error::Integrity(format!("unknown account type code '{}'", other).into())),
		}
	}

	/// Communities of all flavors
	pub fn is_community(self) -> bool {
		matches!(
			self,
			AccountType::Community | AccountType::GlobalCommunity | AccountType::AdminCommunity
		)
	}
}

// Account //
//*********//
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
	pub account_id: AccountId,
	pub name: Box<str>,
	pub typ: AccountType,
	/// Name of the account permission template currently applied
	pub permissions: Box<str>,
	pub created_at: Timestamp,
}

// Content //
//*********//
/// Content variant discriminator, fixed at creation and never changed after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
	StatusUpdate,
	Link,
	Image,
	Video,
	Comment,
}

impl ContentKind {
	pub fn code(self) -> &'static str {
		match self {
			ContentKind::StatusUpdate => "status_update",
			ContentKind::Link => "link",
			ContentKind::Image => "image",
			ContentKind::Video => "video",
			ContentKind::Comment => "comment",
		}
	}

	pub fn from_code(code: &str) -> VnResult<Self> {
		match code {
			"status_update" => Ok(ContentKind::StatusUpdate),
			"link" => Ok(ContentKind::Link),
			"image" => Ok(ContentKind::Image),
			"video" => Ok(ContentKind::Video),
			"comment" => Ok(ContentKind::Comment),
			other => Err(Error::Integrity(format!("unknown content kind '{}'", other).into())),
		}
	}
}

/// The concrete content variants as a tagged union. Dispatch is an explicit
/// match, never a runtime type-name lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBody {
	StatusUpdate { text: Box<str> },
	Link { url: Box<str>, text: Box<str> },
	Image { file_name: Box<str> },
	Video { file_name: Box<str> },
	Comment { of: ContentId, text: Box<str> },
}

impl ContentBody {
	pub fn kind(&self) -> ContentKind {
		match self {
			ContentBody::StatusUpdate { .. } => ContentKind::StatusUpdate,
			ContentBody::Link { .. } => ContentKind::Link,
			ContentBody::Image { .. } => ContentKind::Image,
			ContentBody::Video { .. } => ContentKind::Video,
			ContentBody::Comment { .. } => ContentKind::Comment,
		}
	}

	/// The default text displayed for this content
	pub fn text(&self) -> &str {
		match self {
			ContentBody::StatusUpdate { text }
			| ContentBody::Link { text, .. }
			| ContentBody::Comment { text, .. } => text,
			ContentBody::Image { file_name } | ContentBody::Video { file_name } => file_name,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
	pub content_id: ContentId,
	pub kind: ContentKind,
	pub body: ContentBody,
	/// The original author account, not necessarily the publisher
	/// (esp. for community posts)
	pub author: AccountId,
	/// The account this content is published for; drives visibility
	pub publisher: AccountId,
	/// Name of the content permission template currently applied
	pub permissions: Box<str>,
	/// Self-reference to the content this one translates, not ownership
	pub translation_of: Option<ContentId>,
	/// Attached resource references
	pub attachments: Option<Box<[Box<str>]>>,
	pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_account_type_codes_round_trip() {
		for typ in [
			AccountType::User,
			AccountType::System,
			AccountType::Community,
			AccountType::GlobalCommunity,
			AccountType::AdminCommunity,
		] {
			assert_eq!(AccountType::from_code(typ.code()).unwrap(), typ);
		}
		assert!(AccountType::from_code("X").is_err());
	}

	#[test]
	fn test_content_body_kind() {
		let body = ContentBody::StatusUpdate { text: "Hello, World!".into() };
		assert_eq!(body.kind(), ContentKind::StatusUpdate);
		assert_eq!(body.text(), "Hello, World!");

		let body = ContentBody::Comment { of: ContentId(1), text: "me too".into() };
		assert_eq!(body.kind(), ContentKind::Comment);
	}

	#[test]
	fn test_content_kind_unknown_code_is_integrity_error() {
		assert!(matches!(ContentKind::from_code("blob"), Err(Error::Integrity(_))));
	}
}

// vim: ts=4
