//! Customer directory
//!
//! Holds the customers that own accounts. Identification documents are unique:
//! a secondary index maps each identification to its customer so the
//! uniqueness check and the reservation happen in one step.

use crate::types::{Customer, CustomerDraft, CustomerId, LedgerError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct CustomerDirectory {
    customers: DashMap<CustomerId, Customer>,
    /// Identification → customer id
    identifications: DashMap<String, CustomerId>,
    next_id: AtomicU64,
}

impl CustomerDirectory {
    /// Create an empty directory; ids start at 1
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            identifications: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a customer
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateIdentification`] if another customer
    /// already uses the identification.
    pub fn create(&self, draft: CustomerDraft) -> Result<Customer, LedgerError> {
        let identification = draft.person.identification.clone();
        let mut created = false;

        let id = *self
            .identifications
            .entry(identification.clone())
            .or_insert_with(|| {
                created = true;
                self.next_id.fetch_add(1, Ordering::Relaxed)
            });

        if !created {
            return Err(LedgerError::duplicate_identification(&identification));
        }

        let customer = Customer::from_draft(id, draft);
        self.customers.insert(id, customer.clone());
        Ok(customer)
    }

    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.customers.contains_key(&id)
    }

    /// All customers ordered by id
    pub fn list(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        customers.sort_by_key(|customer| customer.id);
        customers
    }

    /// Replace the personal data and status of a customer
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] if the id is unknown
    /// - [`LedgerError::DuplicateIdentification`] if the new identification
    ///   belongs to another customer
    pub fn update(&self, id: CustomerId, draft: CustomerDraft) -> Result<Customer, LedgerError> {
        let mut entry = self
            .customers
            .get_mut(&id)
            .ok_or_else(|| LedgerError::customer_not_found(id))?;
        let customer = entry.value_mut();

        let old = customer.person.identification.clone();
        let new = draft.person.identification.clone();
        if old != new {
            let mut reserved = false;
            self.identifications.entry(new.clone()).or_insert_with(|| {
                reserved = true;
                id
            });
            if !reserved {
                return Err(LedgerError::duplicate_identification(&new));
            }
            self.identifications.remove(&old);
        }

        customer.person = draft.person;
        customer.active = draft.active;
        Ok(customer.clone())
    }

    /// Remove a customer, returning it if it existed
    ///
    /// Accounts owned by the customer are not touched here.
    pub fn remove(&self, id: CustomerId) -> Option<Customer> {
        let (_, customer) = self.customers.remove(&id)?;
        self.identifications.remove(&customer.person.identification);
        Some(customer)
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
