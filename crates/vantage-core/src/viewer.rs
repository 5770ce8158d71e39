//! Per-unit-of-work viewer binding.
//!
//! The viewer identity is an explicit value threaded through every evaluator
//! call, never shared mutable state: each request, task or test case creates
//! its own `ViewerCtx`, binds an account for the duration of the work, and
//! drops or clears it afterwards. A fresh context always starts cleared, so
//! nothing can leak from a previous unit of work.

use vantage_types::types::Account;

#[derive(Debug, Default)]
pub struct ViewerCtx {
	current: Option<Account>,
}

impl ViewerCtx {
	/// A cleared context; no viewer is bound
	pub fn new() -> Self {
		Self::default()
	}

	/// A context with `account` already bound
	pub fn of(account: Account) -> Self {
		Self { current: Some(account) }
	}

	pub fn set(&mut self, account: Account) {
		self.current = Some(account);
	}

	pub fn clear(&mut self) {
		self.current = None;
	}

	/// The bound account, or `None` for anonymous work
	pub fn get(&self) -> Option<&Account> {
		self.current.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vantage_types::types::{now, AccountId, AccountType};

	fn account(id: i64) -> Account {
		Account {
			account_id: AccountId(id),
			name: format!("user{}", id).into(),
			typ: AccountType::User,
			permissions: "public".into(),
			created_at: now(),
		}
	}

	#[test]
	fn test_new_context_is_cleared() {
		let ctx = ViewerCtx::new();
		assert!(ctx.get().is_none());
	}

	#[test]
	fn test_set_clear_lifecycle() {
		let mut ctx = ViewerCtx::new();
		ctx.set(account(1));
		assert_eq!(ctx.get().map(|a| a.account_id), Some(AccountId(1)));

		ctx.set(account(2));
		assert_eq!(ctx.get().map(|a| a.account_id), Some(AccountId(2)));

		ctx.clear();
		assert!(ctx.get().is_none());
	}

	#[test]
	fn test_contexts_are_independent() {
		let mut a = ViewerCtx::new();
		let b = ViewerCtx::new();
		a.set(account(1));
		assert!(b.get().is_none());
	}
}

// vim: ts=4
