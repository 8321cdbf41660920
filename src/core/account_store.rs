//! Thread-safe account storage
//!
//! This module provides the `AccountStore`, which holds every account record
//! keyed by account number.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) with fine-grained locking.
//! Operations on different accounts proceed in parallel, while operations on
//! the same account are serialized by the entry lock.
//!
//! # Atomic Updates
//!
//! [`AccountStore::update`] runs a closure while holding the write guard of a
//! single account. The ledger engine performs the whole
//! "read balance → validate → append movement → write balance" sequence
//! inside that closure, so two postings on the same account can never start
//! from the same stale balance, and no reader ever observes the balance of a
//! half-applied posting.

use crate::types::{Account, AccountDraft, AccountId, CustomerId, LedgerError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent account store keyed by account number
#[derive(Debug)]
pub struct AccountStore {
    /// Account records by number
    accounts: DashMap<String, Account>,

    /// Next id to hand out
    next_id: AtomicU64,
}

impl AccountStore {
    /// Create a new empty AccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateAccount`] if the number is taken.
    /// Owner existence is the caller's concern.
    pub fn insert(&self, draft: AccountDraft) -> Result<Account, LedgerError> {
        let number = draft.number.clone();
        let mut created = false;

        let account = self
            .accounts
            .entry(number.clone())
            .or_insert_with(|| {
                created = true;
                let id: AccountId = self.next_id.fetch_add(1, Ordering::Relaxed);
                Account::from_draft(id, draft)
            })
            .clone();

        if !created {
            return Err(LedgerError::duplicate_account(&number));
        }

        Ok(account)
    }

    /// Get a snapshot of an account
    pub fn get(&self, number: &str) -> Option<Account> {
        self.accounts.get(number).map(|entry| entry.value().clone())
    }

    /// Check whether an account number is registered
    pub fn contains(&self, number: &str) -> bool {
        self.accounts.contains_key(number)
    }

    /// Update an account using a closure
    ///
    /// The closure runs while the account's entry is write-locked. If it
    /// returns an error, whatever it did to the account is still visible, so
    /// closures must validate before mutating.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if no account has this number,
    /// or the closure's own error.
    pub fn update<T, F>(&self, number: &str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        let mut entry = self
            .accounts
            .get_mut(number)
            .ok_or_else(|| LedgerError::account_not_found(number))?;
        f(entry.value_mut())
    }

    /// Remove an account, returning it if it existed
    pub fn remove(&self, number: &str) -> Option<Account> {
        self.accounts.remove(number).map(|(_, account)| account)
    }

    /// All accounts sorted by number
    pub fn list(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }

    /// Accounts owned by a customer, in creation order
    pub fn list_by_owner(&self, owner: CustomerId) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
