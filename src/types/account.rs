//! Account-related types
//!
//! This module defines the Account record held by the account store and the
//! administrative inputs used to create and update it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::customer::CustomerId;

/// Account identifier, assigned by the store starting at 1
pub type AccountId = u64;

/// Kind of account product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Savings,
    Checking,
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" | "ahorros" => Ok(AccountType::Savings),
            "checking" | "corriente" => Ok(AccountType::Checking),
            other => Err(format!("Invalid account type '{}'", other)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Savings => "SAVINGS",
            AccountType::Checking => "CHECKING",
        };
        f.write_str(label)
    }
}

/// Balance-bearing account owned by a customer
///
/// `balance` always equals the `balance_after` of the last movement posted to
/// the account, or the initial balance if nothing has been posted yet. Only the
/// ledger engine changes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: AccountId,

    /// Unique, immutable account number
    pub number: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current running balance
    pub balance: Decimal,

    pub active: bool,

    /// Owning customer
    pub owner: CustomerId,
}

/// Data required to open an account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub number: String,
    pub account_type: AccountType,
    /// Opening balance, zero when not given
    pub initial_balance: Option<Decimal>,
    pub active: bool,
    pub owner: CustomerId,
}

impl AccountDraft {
    /// Active account with a zero opening balance
    pub fn new(number: &str, account_type: AccountType, owner: CustomerId) -> Self {
        Self {
            number: number.to_string(),
            account_type,
            initial_balance: None,
            active: true,
            owner,
        }
    }

    /// Set the opening balance
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.initial_balance = Some(balance);
        self
    }
}

/// Administrative update of the non-financial fields of an account
///
/// The number and the balance cannot be changed this way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub account_type: Option<AccountType>,
    pub active: Option<bool>,
    pub owner: Option<CustomerId>,
}

impl Account {
    /// Build the stored record from a draft and its assigned id
    pub fn from_draft(id: AccountId, draft: AccountDraft) -> Self {
        Account {
            id,
            number: draft.number,
            account_type: draft.account_type,
            balance: draft.initial_balance.unwrap_or(Decimal::ZERO),
            active: draft.active,
            owner: draft.owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("savings", AccountType::Savings)]
    #[case("CHECKING", AccountType::Checking)]
    #[case("Ahorros", AccountType::Savings)]
    #[case("corriente", AccountType::Checking)]
    fn test_account_type_parsing(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>().unwrap(), expected);
    }

    #[test]
    fn test_account_type_rejects_unknown() {
        assert!("brokerage".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_from_draft_defaults_balance_to_zero() {
        let account = Account::from_draft(1, AccountDraft::new("123", AccountType::Savings, 4));

        assert_eq!(account.number, "123");
        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.active);
        assert_eq!(account.owner, 4);
    }

    #[test]
    fn test_from_draft_uses_initial_balance() {
        let draft = AccountDraft::new("123", AccountType::Checking, 1).with_balance(dec!(100.0));
        let account = Account::from_draft(2, draft);

        assert_eq!(account.id, 2);
        assert_eq!(account.balance, dec!(100.0));
    }
}
