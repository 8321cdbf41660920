//! In-memory movement storage
//!
//! This module provides `InMemoryMovementStore`, the default [`MovementStore`]
//! backend. Movements are kept per account in posting order, with a secondary
//! index from movement id to account number for id lookups and deletion.
//!
//! # Ordering
//!
//! Each account's movements are kept ordered by `(timestamp, id)`. The engine
//! never posts a movement older than the account's latest one, so in practice
//! every append lands at the end.

use crate::core::traits::MovementStore;
use crate::types::{LedgerError, Movement, MovementId, NewMovement};
use chrono::NaiveDateTime;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Movement store backed by concurrent hash maps
#[derive(Debug)]
pub struct InMemoryMovementStore {
    /// Movements of each account, ordered by (timestamp, id)
    by_account: DashMap<String, Vec<Movement>>,

    /// Movement id → owning account number
    index: DashMap<MovementId, String>,

    next_id: AtomicU64,
}

impl InMemoryMovementStore {
    /// Create an empty store; movement ids start at 1
    pub fn new() -> Self {
        Self {
            by_account: DashMap::new(),
            index: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Total number of stored movements
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for InMemoryMovementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let movement = Movement::from_new(id, movement);

        let mut movements = self.by_account.entry(movement.account.clone()).or_default();
        let position = movements
            .partition_point(|existing| (existing.timestamp, existing.id) <= (movement.timestamp, id));
        movements.insert(position, movement.clone());
        // Index while the account list is still locked so a reader never sees
        // the movement in one map and not the other
        self.index.insert(id, movement.account.clone());

        Ok(movement)
    }

    fn get(&self, id: MovementId) -> Result<Option<Movement>, LedgerError> {
        let Some(account) = self.index.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        Ok(self.by_account.get(&account).and_then(|movements| {
            movements
                .iter()
                .find(|movement| movement.id == id)
                .cloned()
        }))
    }

    fn list_by_account(&self, account: &str) -> Result<Vec<Movement>, LedgerError> {
        Ok(self
            .by_account
            .get(account)
            .map(|movements| movements.value().clone())
            .unwrap_or_default())
    }

    fn latest_timestamp(&self, account: &str) -> Result<Option<NaiveDateTime>, LedgerError> {
        Ok(self
            .by_account
            .get(account)
            .and_then(|movements| movements.last().map(|movement| movement.timestamp)))
    }

    fn remove(&self, id: MovementId) -> Result<Option<Movement>, LedgerError> {
        let Some((_, account)) = self.index.remove(&id) else {
            return Ok(None);
        };

        let Some(mut movements) = self.by_account.get_mut(&account) else {
            return Err(LedgerError::storage_failure(format!(
                "movement {} indexed under missing account {}",
                id, account
            )));
        };

        match movements.iter().position(|movement| movement.id == id) {
            Some(position) => Ok(Some(movements.remove(position))),
            None => Err(LedgerError::storage_failure(format!(
                "movement {} indexed under account {} but not stored there",
                id, account
            ))),
        }
    }

    fn remove_account(&self, account: &str) -> Result<usize, LedgerError> {
        let Some((_, movements)) = self.by_account.remove(account) else {
            return Ok(0);
        };

        for movement in &movements {
            self.index.remove(&movement.id);
        }

        Ok(movements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovementKind;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn new_movement(account: &str, timestamp: NaiveDateTime, amount: Decimal) -> NewMovement {
        NewMovement {
            account: account.to_string(),
            timestamp,
            kind: MovementKind::Credit,
            amount,
            balance_after: amount,
        }
    }

    #[test]
    fn test_append_assigns_ids_and_indexes() {
        let store = InMemoryMovementStore::new();

        let first = store.append(new_movement("123", at(5, 9), dec!(100))).unwrap();
        let second = store.append(new_movement("456", at(5, 10), dec!(10))).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap(), Some(first));
        assert_eq!(store.get(3).unwrap(), None);
    }

    #[test]
    fn test_list_by_account_is_chronological() {
        let store = InMemoryMovementStore::new();
        store.append(new_movement("123", at(10, 9), dec!(2))).unwrap();
        store.append(new_movement("123", at(5, 9), dec!(1))).unwrap();
        store.append(new_movement("123", at(10, 9), dec!(3))).unwrap();
        store.append(new_movement("999", at(1, 9), dec!(9))).unwrap();

        let amounts: Vec<Decimal> = store
            .list_by_account("123")
            .unwrap()
            .into_iter()
            .map(|m| m.amount)
            .collect();

        // Same timestamp falls back to insertion order
        assert_eq!(amounts, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn test_latest_timestamp() {
        let store = InMemoryMovementStore::new();
        assert_eq!(store.latest_timestamp("123").unwrap(), None);

        store.append(new_movement("123", at(5, 9), dec!(1))).unwrap();
        let last = store.append(new_movement("123", at(7, 14), dec!(2))).unwrap();
        store.append(new_movement("456", at(9, 9), dec!(3))).unwrap();

        assert_eq!(store.latest_timestamp("123").unwrap(), Some(at(7, 14)));

        store.remove(last.id).unwrap();
        assert_eq!(store.latest_timestamp("123").unwrap(), Some(at(5, 9)));
    }

    #[test]
    fn test_list_by_unknown_account_is_empty() {
        let store = InMemoryMovementStore::new();
        assert!(store.list_by_account("nope").unwrap().is_empty());
    }

    #[test]
    fn test_remove_single_movement() {
        let store = InMemoryMovementStore::new();
        let kept = store.append(new_movement("123", at(5, 9), dec!(1))).unwrap();
        let dropped = store.append(new_movement("123", at(6, 9), dec!(2))).unwrap();

        assert_eq!(store.remove(dropped.id).unwrap(), Some(dropped.clone()));
        assert_eq!(store.remove(dropped.id).unwrap(), None);
        assert_eq!(store.list_by_account("123").unwrap(), vec![kept]);
    }

    #[test]
    fn test_remove_account_drops_everything() {
        let store = InMemoryMovementStore::new();
        store.append(new_movement("123", at(5, 9), dec!(1))).unwrap();
        store.append(new_movement("123", at(6, 9), dec!(2))).unwrap();
        let other = store.append(new_movement("456", at(6, 9), dec!(3))).unwrap();

        assert_eq!(store.remove_account("123").unwrap(), 2);
        assert_eq!(store.remove_account("123").unwrap(), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(other.id).unwrap(), Some(other));
    }
}
