//! Statement building
//!
//! Builds a customer's account statement over a date window from the stored
//! movements. Balances are never recomputed: every line shows the balance
//! stamped on its movement at posting time, and the closing balance is the
//! stamp of the last movement in the window.
//!
//! # Empty accounts
//!
//! If any account of the customer has no movement inside the window, the
//! whole statement fails with [`LedgerError::NoMovementsInRange`]. There is no
//! partial statement.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::core::account_store::AccountStore;
use crate::core::customer_directory::CustomerDirectory;
use crate::core::query::{DateWindow, MovementQuery};
use crate::core::traits::Clock;
use crate::types::{
    Account, AccountStatement, CustomerId, LedgerError, Movement, MovementKind, MovementLine,
    Statement,
};

#[derive(Clone)]
pub struct StatementBuilder {
    customers: Arc<CustomerDirectory>,
    accounts: Arc<AccountStore>,
    query: MovementQuery,
    clock: Arc<dyn Clock>,
}

impl StatementBuilder {
    /// Create a statement builder
    ///
    /// # Arguments
    ///
    /// * `customers` - Directory resolving the statement's customer
    /// * `accounts` - Account records listed on the statement
    /// * `query` - Windowed movement reads
    /// * `clock` - Source of the statement's generation date
    pub fn new(
        customers: Arc<CustomerDirectory>,
        accounts: Arc<AccountStore>,
        query: MovementQuery,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            customers,
            accounts,
            query,
            clock,
        }
    }

    /// Build the statement of `customer` for `window`
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] if the customer is unknown
    /// - [`LedgerError::NoMovementsInRange`] if any of its accounts is quiet
    ///   in the window
    /// - [`LedgerError::StorageFailure`] if movements cannot be read
    pub fn build(
        &self,
        customer: CustomerId,
        window: &DateWindow,
    ) -> Result<Statement, LedgerError> {
        let record = self
            .customers
            .get(customer)
            .ok_or_else(|| LedgerError::customer_not_found(customer))?;

        let accounts = self
            .accounts
            .list_by_owner(customer)
            .iter()
            .map(|account| {
                let movements = self.query.list_by_account_in(&account.number, window)?;
                summarize(account, &movements, window)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Statement {
            customer_id: record.id,
            customer: record.person.name,
            generated_at: self.clock.now().date(),
            start: window.start,
            end: window.end,
            accounts,
        })
    }
}

/// Aggregate the window's movements of one account, oldest first
fn summarize(
    account: &Account,
    movements: &[Movement],
    window: &DateWindow,
) -> Result<AccountStatement, LedgerError> {
    let (Some(first), Some(last)) = (movements.first(), movements.last()) else {
        return Err(LedgerError::no_movements_in_range(
            &account.number,
            window.start,
            window.end,
        ));
    };

    let overflow = || LedgerError::arithmetic_overflow("statement totals", &account.number);
    let mut total_credits = Decimal::ZERO;
    let mut total_debits = Decimal::ZERO;
    let mut lines = Vec::with_capacity(movements.len());

    for movement in movements {
        match movement.kind {
            MovementKind::Credit => {
                total_credits = total_credits.checked_add(movement.amount).ok_or_else(overflow)?
            }
            MovementKind::Debit => {
                total_debits = total_debits.checked_add(movement.amount).ok_or_else(overflow)?
            }
        }
        lines.push(MovementLine {
            date: movement.timestamp.date(),
            kind: movement.kind,
            signed_amount: movement.signed_amount(),
            available_balance: movement.balance_after,
        });
    }

    let opening_balance = first
        .balance_after
        .checked_sub(first.signed_amount())
        .ok_or_else(overflow)?;

    Ok(AccountStatement {
        number: account.number.clone(),
        account_type: account.account_type,
        opening_balance,
        active: account.active,
        movements: lines,
        total_credits,
        total_debits,
        closing_balance: last.balance_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::engine::LedgerEngine;
    use crate::core::movement_store::InMemoryMovementStore;
    use crate::core::traits::MovementStore;
    use crate::types::{AccountDraft, AccountType, CustomerDraft, Gender, Person};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn at(m: u32, d: u32) -> NaiveDateTime {
        date(m, d).and_hms_opt(10, 0, 0).unwrap()
    }

    fn january() -> DateWindow {
        DateWindow::new(date(1, 1), date(1, 31))
    }

    struct Fixture {
        customer: CustomerId,
        accounts: Arc<AccountStore>,
        engine: LedgerEngine,
        builder: StatementBuilder,
    }

    fn fixture() -> Fixture {
        let customers = Arc::new(CustomerDirectory::new());
        let accounts = Arc::new(AccountStore::new());
        let movements: Arc<dyn MovementStore> = Arc::new(InMemoryMovementStore::new());
        let clock = Arc::new(ManualClock::new(at(2, 15)));

        let customer = customers
            .create(CustomerDraft::new(Person {
                name: "Marianela Montalvo".to_string(),
                gender: Gender::Female,
                age: 29,
                identification: "1718".to_string(),
                address: "Amazonas y NNUU".to_string(),
                phone: "0975".to_string(),
            }))
            .unwrap();

        let engine = LedgerEngine::new(Arc::clone(&accounts), Arc::clone(&movements), clock.clone());
        let query = MovementQuery::new(Arc::clone(&customers), Arc::clone(&accounts), movements);
        let builder = StatementBuilder::new(customers, Arc::clone(&accounts), query, clock);

        Fixture {
            customer: customer.id,
            accounts,
            engine,
            builder,
        }
    }

    fn open(f: &Fixture, number: &str) {
        f.accounts
            .insert(AccountDraft::new(number, AccountType::Savings, f.customer))
            .unwrap();
    }

    #[test]
    fn test_totals_and_closing_balance() {
        let f = fixture();
        open(&f, "123");
        f.engine
            .post_at("123", MovementKind::Credit, dec!(100), at(1, 5))
            .unwrap();
        f.engine
            .post_at("123", MovementKind::Debit, dec!(40), at(1, 10))
            .unwrap();

        let statement = f.builder.build(f.customer, &january()).unwrap();

        assert_eq!(statement.customer, "Marianela Montalvo");
        assert_eq!(statement.generated_at, date(2, 15));
        let account = &statement.accounts[0];
        assert_eq!(account.total_credits, dec!(100));
        assert_eq!(account.total_debits, dec!(40));
        assert_eq!(account.closing_balance, dec!(60));
        assert_eq!(account.opening_balance, dec!(0));
        assert_eq!(account.movements.len(), 2);
        assert_eq!(account.movements[1].signed_amount, dec!(-40));
        assert_eq!(account.movements[1].available_balance, dec!(60));
        assert_eq!(account.movements[1].date, date(1, 10));
    }

    #[test]
    fn test_window_excludes_outside_movements() {
        let f = fixture();
        open(&f, "123");
        let december = NaiveDate::from_ymd_opt(2023, 12, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        f.engine
            .post_at("123", MovementKind::Credit, dec!(500), december)
            .unwrap();
        f.engine
            .post_at("123", MovementKind::Debit, dec!(100), at(1, 15))
            .unwrap();
        f.engine
            .post_at("123", MovementKind::Credit, dec!(50), at(2, 1))
            .unwrap();

        let statement = f.builder.build(f.customer, &january()).unwrap();

        let account = &statement.accounts[0];
        assert_eq!(account.movements.len(), 1);
        assert_eq!(account.opening_balance, dec!(500));
        assert_eq!(account.total_credits, Decimal::ZERO);
        assert_eq!(account.total_debits, dec!(100));
        assert_eq!(account.closing_balance, dec!(400));
    }

    #[test]
    fn test_quiet_account_fails_whole_statement() {
        let f = fixture();
        open(&f, "123");

        let result = f.builder.build(f.customer, &january());

        assert_eq!(
            result.unwrap_err(),
            LedgerError::no_movements_in_range("123", date(1, 1), date(1, 31))
        );
    }

    #[test]
    fn test_one_quiet_account_among_many_fails() {
        let f = fixture();
        open(&f, "123");
        open(&f, "456");
        f.engine
            .post_at("123", MovementKind::Credit, dec!(10), at(1, 3))
            .unwrap();

        let result = f.builder.build(f.customer, &january());

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::NoMovementsInRange { account, .. } if account == "456"
        ));
    }

    #[test]
    fn test_customer_without_accounts_gets_empty_statement() {
        let f = fixture();

        let statement = f.builder.build(f.customer, &january()).unwrap();

        assert!(statement.accounts.is_empty());
    }

    #[test]
    fn test_unknown_customer() {
        let f = fixture();

        let result = f.builder.build(404, &january());

        assert_eq!(result.unwrap_err(), LedgerError::customer_not_found(404));
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let f = fixture();
        open(&f, "123");
        open(&f, "456");
        for (account, kind, amount, day) in [
            ("123", MovementKind::Credit, dec!(300), 2),
            ("456", MovementKind::Credit, dec!(80), 4),
            ("123", MovementKind::Debit, dec!(120.25), 9),
            ("456", MovementKind::Debit, dec!(80), 20),
        ] {
            f.engine.post_at(account, kind, amount, at(1, day)).unwrap();
        }

        let first = f.builder.build(f.customer, &january()).unwrap();
        let second = f.builder.build(f.customer, &january()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.accounts[0].closing_balance, dec!(179.75));
        assert_eq!(first.accounts[1].closing_balance, dec!(0));
    }
}
