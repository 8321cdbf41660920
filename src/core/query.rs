//! Movement queries
//!
//! Read-only access to posted movements, by account and by customer over a
//! date window.
//!
//! # Date windows
//!
//! A [`DateWindow`] covers whole days: from `start` at midnight (inclusive) up
//! to midnight after `end` (exclusive). A bound the caller leaves out
//! defaults to the current day, so a window is never widened to all of
//! history.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Reverse;
use std::sync::Arc;

use crate::core::account_store::AccountStore;
use crate::core::customer_directory::CustomerDirectory;
use crate::core::traits::MovementStore;
use crate::types::{CustomerId, LedgerError, Movement};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a window from optional caller bounds
    ///
    /// Each missing bound defaults to `today` on its own: no bounds give
    /// `today..=today`, only a start gives `start..=today`.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self::new(start.unwrap_or(today), end.unwrap_or(today))
    }

    /// First instant inside the window
    pub fn lower_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// First instant after the window, `None` when `end` is the last
    /// representable day
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.end.succ_opt().map(|next| next.and_time(NaiveTime::MIN))
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.lower_bound()
            && self
                .upper_bound()
                .map_or(true, |upper| timestamp < upper)
    }
}

/// Read side over accounts and movements
#[derive(Clone)]
pub struct MovementQuery {
    customers: Arc<CustomerDirectory>,
    accounts: Arc<AccountStore>,
    movements: Arc<dyn MovementStore>,
}

impl MovementQuery {
    /// Create a query over shared stores
    ///
    /// # Arguments
    ///
    /// * `customers` - Directory used to resolve a customer's existence
    /// * `accounts` - Account records, used to find a customer's accounts
    /// * `movements` - Backend holding posted movements
    pub fn new(
        customers: Arc<CustomerDirectory>,
        accounts: Arc<AccountStore>,
        movements: Arc<dyn MovementStore>,
    ) -> Self {
        Self {
            customers,
            accounts,
            movements,
        }
    }

    /// Movements of an account, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the account is unknown.
    pub fn list_by_account(&self, account: &str) -> Result<Vec<Movement>, LedgerError> {
        if !self.accounts.contains(account) {
            return Err(LedgerError::account_not_found(account));
        }
        self.movements.list_by_account(account)
    }

    /// Movements of an account inside a window, oldest first
    pub fn list_by_account_in(
        &self,
        account: &str,
        window: &DateWindow,
    ) -> Result<Vec<Movement>, LedgerError> {
        let mut movements = self.movements.list_by_account(account)?;
        movements.retain(|movement| window.contains(movement.timestamp));
        Ok(movements)
    }

    /// Movements across every account of a customer inside a window, newest
    /// first
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustomerNotFound`] if the customer is unknown.
    pub fn list_by_customer(
        &self,
        customer: CustomerId,
        window: &DateWindow,
    ) -> Result<Vec<Movement>, LedgerError> {
        if !self.customers.contains(customer) {
            return Err(LedgerError::customer_not_found(customer));
        }

        let mut movements = Vec::new();
        for account in self.accounts.list_by_owner(customer) {
            movements.extend(self.list_by_account_in(&account.number, window)?);
        }
        movements.sort_by_key(|movement| Reverse((movement.timestamp, movement.id)));

        Ok(movements)
    }
}
