//! Ledger facade
//!
//! [`Ledger`] wires the customer directory, account store, movement store,
//! engine, queries and statement builder together and exposes every operation
//! a caller needs. It owns the cascade rules: deleting an account drops its
//! movements, deleting a customer drops its accounts.
//!
//! # Architecture
//!
//! ```text
//! Ledger
//!     ├── Arc<CustomerDirectory>
//!     ├── Arc<AccountStore>
//!     ├── Arc<dyn MovementStore>
//!     ├── Arc<dyn Clock>
//!     ├── LedgerEngine        (posting)
//!     ├── MovementQuery       (reads)
//!     └── StatementBuilder    (statements)
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::core::account_store::AccountStore;
use crate::core::clock::SystemClock;
use crate::core::customer_directory::CustomerDirectory;
use crate::core::engine::LedgerEngine;
use crate::core::movement_store::InMemoryMovementStore;
use crate::core::query::{DateWindow, MovementQuery};
use crate::core::statement_builder::StatementBuilder;
use crate::core::traits::{Clock, MovementStore};
use crate::io::document;
use crate::types::{
    Account, AccountDraft, AccountUpdate, Customer, CustomerDraft, CustomerId, LedgerError,
    MovementId, MovementKind, MovementRequest, MovementView, Statement, StatementFormat,
    StatementReport,
};

#[derive(Clone)]
pub struct Ledger {
    customers: Arc<CustomerDirectory>,
    accounts: Arc<AccountStore>,
    movements: Arc<dyn MovementStore>,
    clock: Arc<dyn Clock>,
    engine: LedgerEngine,
    query: MovementQuery,
    statements: StatementBuilder,
}

impl Ledger {
    /// In-memory ledger on the system clock
    ///
    /// # Returns
    ///
    /// An empty ledger with no customers, accounts or movements
    pub fn new() -> Self {
        Self::with_parts(Arc::new(InMemoryMovementStore::new()), Arc::new(SystemClock))
    }

    /// Ledger over a given movement backend and clock
    ///
    /// # Arguments
    ///
    /// * `movements` - Backend that stores posted movements
    /// * `clock` - Source of the current time for postings and date windows
    pub fn with_parts(movements: Arc<dyn MovementStore>, clock: Arc<dyn Clock>) -> Self {
        let customers = Arc::new(CustomerDirectory::new());
        let accounts = Arc::new(AccountStore::new());

        let engine = LedgerEngine::new(
            Arc::clone(&accounts),
            Arc::clone(&movements),
            Arc::clone(&clock),
        );
        let query = MovementQuery::new(
            Arc::clone(&customers),
            Arc::clone(&accounts),
            Arc::clone(&movements),
        );
        let statements = StatementBuilder::new(
            Arc::clone(&customers),
            Arc::clone(&accounts),
            query.clone(),
            Arc::clone(&clock),
        );

        Self {
            customers,
            accounts,
            movements,
            clock,
            engine,
            query,
            statements,
        }
    }

    // Customers

    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateIdentification`] if the identification
    /// is already registered.
    pub fn create_customer(&self, draft: CustomerDraft) -> Result<Customer, LedgerError> {
        let customer = self.customers.create(draft)?;
        info!(customer = customer.id, "customer created");
        Ok(customer)
    }

    /// Look up a customer by id
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustomerNotFound`] if no customer has this id.
    pub fn get_customer(&self, id: CustomerId) -> Result<Customer, LedgerError> {
        self.customers
            .get(id)
            .ok_or_else(|| LedgerError::customer_not_found(id))
    }

    /// All customers sorted by id
    pub fn list_customers(&self) -> Vec<Customer> {
        self.customers.list()
    }

    /// Replace a customer's personal data and status
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] if no customer has this id
    /// - [`LedgerError::DuplicateIdentification`] if the new identification
    ///   belongs to another customer
    pub fn update_customer(
        &self,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> Result<Customer, LedgerError> {
        let customer = self.customers.update(id, draft)?;
        info!(customer = id, "customer updated");
        Ok(customer)
    }

    /// Delete a customer together with its accounts and their movements
    ///
    /// The customer leaves the directory first, so an account opened
    /// concurrently either fails its owner check or is swept up here.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CustomerNotFound`] if the customer is unknown,
    /// or a storage error from dropping an account's movements.
    pub fn delete_customer(&self, id: CustomerId) -> Result<Customer, LedgerError> {
        let customer = self
            .customers
            .remove(id)
            .ok_or_else(|| LedgerError::customer_not_found(id))?;

        let accounts = self.accounts.list_by_owner(id);
        for account in &accounts {
            match self.delete_account(&account.number) {
                // Already rolled back by a racing create_account
                Ok(_) | Err(LedgerError::AccountNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        info!(customer = id, accounts = accounts.len(), "customer deleted");
        Ok(customer)
    }

    // Accounts

    /// Open an account for an existing customer
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] if the owner is unknown
    /// - [`LedgerError::DuplicateAccount`] if the number is taken
    pub fn create_account(&self, draft: AccountDraft) -> Result<Account, LedgerError> {
        if !self.customers.contains(draft.owner) {
            return Err(LedgerError::customer_not_found(draft.owner));
        }

        let account = self.accounts.insert(draft)?;
        // The owner may have been deleted since the check above
        if !self.customers.contains(account.owner) {
            self.accounts.remove(&account.number);
            return Err(LedgerError::customer_not_found(account.owner));
        }
        info!(
            account = %account.number,
            owner = account.owner,
            balance = %account.balance,
            "account created"
        );
        Ok(account)
    }

    /// Look up an account by number
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if no account has this number.
    pub fn get_account(&self, number: &str) -> Result<Account, LedgerError> {
        self.accounts
            .get(number)
            .ok_or_else(|| LedgerError::account_not_found(number))
    }

    /// All accounts sorted by number
    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.list()
    }

    /// Change the type, status or owner of an account
    ///
    /// Number and balance are not administrative fields and never change here.
    pub fn update_account(
        &self,
        number: &str,
        update: AccountUpdate,
    ) -> Result<Account, LedgerError> {
        if let Some(owner) = update.owner {
            if !self.customers.contains(owner) {
                return Err(LedgerError::customer_not_found(owner));
            }
        }

        let account = self.accounts.update(number, |account| {
            if let Some(account_type) = update.account_type {
                account.account_type = account_type;
            }
            if let Some(active) = update.active {
                account.active = active;
            }
            if let Some(owner) = update.owner {
                account.owner = owner;
            }
            Ok(account.clone())
        })?;

        info!(account = number, "account updated");
        Ok(account)
    }

    /// Delete an account and every movement posted to it
    pub fn delete_account(&self, number: &str) -> Result<Account, LedgerError> {
        // Account first: once it is gone no posting can add a movement
        let account = self
            .accounts
            .remove(number)
            .ok_or_else(|| LedgerError::account_not_found(number))?;
        let removed = self.movements.remove_account(number)?;

        info!(account = number, movements = removed, "account deleted");
        Ok(account)
    }

    // Movements

    /// Post a movement stamped with the current time
    ///
    /// See [`LedgerEngine::post`] for the rules and errors.
    pub fn post_movement(
        &self,
        account: &str,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementView, LedgerError> {
        self.engine.post(account, kind, amount).map(MovementView::from)
    }

    /// Post a movement carrying its own timestamp
    pub fn import_movement(
        &self,
        account: &str,
        kind: MovementKind,
        amount: Decimal,
        timestamp: NaiveDateTime,
    ) -> Result<MovementView, LedgerError> {
        self.engine
            .post_at(account, kind, amount, timestamp)
            .map(MovementView::from)
    }

    /// Post a request, importing it when it carries a timestamp
    pub fn apply(&self, request: &MovementRequest) -> Result<MovementView, LedgerError> {
        match request.timestamp {
            Some(timestamp) => {
                self.import_movement(&request.account, request.kind, request.amount, timestamp)
            }
            None => self.post_movement(&request.account, request.kind, request.amount),
        }
    }

    /// Look up a posted movement by id
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MovementNotFound`] if no movement has this id.
    pub fn get_movement(&self, id: MovementId) -> Result<MovementView, LedgerError> {
        self.movements
            .get(id)?
            .map(MovementView::from)
            .ok_or_else(|| LedgerError::movement_not_found(id))
    }

    /// Movements of an account, oldest first
    pub fn list_movements_by_account(
        &self,
        number: &str,
    ) -> Result<Vec<MovementView>, LedgerError> {
        Ok(self
            .query
            .list_by_account(number)?
            .into_iter()
            .map(MovementView::from)
            .collect())
    }

    /// Movements of a customer's accounts in a date window, newest first
    ///
    /// A missing bound defaults to the current day.
    pub fn list_movements_by_customer(
        &self,
        customer: CustomerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<MovementView>, LedgerError> {
        let window = self.window(start, end);
        Ok(self
            .query
            .list_by_customer(customer, &window)?
            .into_iter()
            .map(MovementView::from)
            .collect())
    }

    /// Delete a single movement
    ///
    /// The account balance is left as it is; later balance stamps are not
    /// rewritten either.
    pub fn delete_movement(&self, id: MovementId) -> Result<MovementView, LedgerError> {
        let movement = self
            .movements
            .remove(id)?
            .ok_or_else(|| LedgerError::movement_not_found(id))?;

        info!(movement = id, account = %movement.account, "movement deleted");
        Ok(MovementView::from(movement))
    }

    // Statements

    /// Build the structured statement of a customer
    pub fn statement(
        &self,
        customer: CustomerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Statement, LedgerError> {
        let window = self.window(start, end);
        self.statements.build(customer, &window)
    }

    /// Build a statement in the requested format
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] if the customer is unknown
    /// - [`LedgerError::NoMovementsInRange`] if any account is quiet in the
    ///   window
    pub fn get_statement(
        &self,
        customer: CustomerId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        format: StatementFormat,
    ) -> Result<StatementReport, LedgerError> {
        let statement = self.statement(customer, start, end)?;
        Ok(match format {
            StatementFormat::Structured => StatementReport::Structured(statement),
            StatementFormat::Document => StatementReport::Document(document::render(&statement)?),
        })
    }

    fn window(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateWindow {
        DateWindow::resolve(start, end, self.clock.now().date())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
