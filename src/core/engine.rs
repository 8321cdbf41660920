//! Ledger engine
//!
//! This module provides the `LedgerEngine`, the only component allowed to
//! change an account balance. It applies a credit or debit to an account,
//! validating the amount and the available funds, and records the resulting
//! movement.
//!
//! The engine enforces these rules:
//! - The caller's sign on the amount is ignored; the kind alone sets direction
//! - A zero amount is rejected before any account is touched
//! - A debit can never take the balance below zero
//! - A movement is never older than the account's latest movement, so the
//!   stamped balances read in chronological order
//! - The movement append and the balance write happen as one unit, while the
//!   account is locked in the [`AccountStore`]

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::core::account_store::AccountStore;
use crate::core::traits::{Clock, MovementStore};
use crate::types::{LedgerError, Movement, MovementKind, NewMovement};

/// Balance-mutating core of the ledger
#[derive(Clone)]
pub struct LedgerEngine {
    accounts: Arc<AccountStore>,
    movements: Arc<dyn MovementStore>,
    clock: Arc<dyn Clock>,
}

impl LedgerEngine {
    /// Create an engine over shared account and movement stores
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account records, locked per account during a posting
    /// * `movements` - Backend receiving every posted movement
    /// * `clock` - Source of the timestamp for live postings
    pub fn new(
        accounts: Arc<AccountStore>,
        movements: Arc<dyn MovementStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            movements,
            clock,
        }
    }

    /// Post a movement stamped with the current time
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if the amount is zero
    /// - [`LedgerError::AccountNotFound`] if no account has this number
    /// - [`LedgerError::InsufficientFunds`] if a debit exceeds the balance
    /// - [`LedgerError::OutOfOrderMovement`] if the clock is behind the
    ///   account's latest movement
    /// - [`LedgerError::ArithmeticOverflow`] if a credit overflows the balance
    /// - [`LedgerError::StorageFailure`] if the movement cannot be stored
    ///
    /// On any error the account balance is unchanged and no movement exists.
    pub fn post(
        &self,
        account: &str,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<Movement, LedgerError> {
        self.post_at(account, kind, amount, self.clock.now())
    }

    /// Post a movement with an explicit timestamp
    ///
    /// Used to import dated movements. Balance rules are identical to
    /// [`LedgerEngine::post`]: the new balance is computed from the account's
    /// current balance. A timestamp equal to the latest movement's is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Same as [`LedgerEngine::post`]; [`LedgerError::OutOfOrderMovement`]
    /// when `timestamp` is earlier than the account's latest movement.
    pub fn post_at(
        &self,
        account: &str,
        kind: MovementKind,
        amount: Decimal,
        timestamp: NaiveDateTime,
    ) -> Result<Movement, LedgerError> {
        let magnitude = amount.abs();
        if magnitude.is_zero() {
            return Err(LedgerError::invalid_amount(account, amount));
        }

        let movement = self.accounts.update(account, |record| {
            if let Some(latest) = self.movements.latest_timestamp(&record.number)? {
                if timestamp < latest {
                    return Err(LedgerError::out_of_order_movement(account, timestamp, latest));
                }
            }
            let new_balance = apply(account, record.balance, kind, magnitude)?;

            let movement = self.movements.append(NewMovement {
                account: record.number.clone(),
                timestamp,
                kind,
                amount: magnitude,
                balance_after: new_balance,
            })?;

            record.balance = new_balance;
            Ok(movement)
        })?;

        debug!(
            account,
            movement = movement.id,
            kind = %movement.kind,
            amount = %movement.amount,
            balance = %movement.balance_after,
            "movement posted"
        );

        Ok(movement)
    }
}

/// Compute the balance after applying `amount` in the direction of `kind`
fn apply(
    account: &str,
    balance: Decimal,
    kind: MovementKind,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    match kind {
        MovementKind::Credit => balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", account)),
        MovementKind::Debit => {
            let new_balance = balance
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("debit", account))?;
            if new_balance < Decimal::ZERO {
                return Err(LedgerError::insufficient_funds(account, balance, amount));
            }
            Ok(new_balance)
        }
    }
}
