//! Movement-related types
//!
//! A movement is one posted credit or debit against an account. Storage keeps
//! an unsigned magnitude plus the kind; the signed value is derived for
//! callers and reports.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;

/// Movement identifier, assigned by the movement store starting at 1
pub type MovementId = u64;

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Adds the amount to the balance
    Credit,
    /// Subtracts the amount from the balance; never below zero
    Debit,
}

impl MovementKind {
    /// Apply the kind's sign to an unsigned magnitude
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            MovementKind::Credit => amount.abs(),
            MovementKind::Debit => -amount.abs(),
        }
    }
}

impl FromStr for MovementKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "credito" | "crédito" => Ok(MovementKind::Credit),
            "debit" | "debito" | "débito" => Ok(MovementKind::Debit),
            _ => Err(LedgerError::invalid_movement_kind(s.trim())),
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementKind::Credit => "CREDIT",
            MovementKind::Debit => "DEBIT",
        };
        f.write_str(label)
    }
}

/// Request to post a movement
///
/// Without a timestamp the movement is stamped with the ledger clock at
/// posting time.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRequest {
    pub account: String,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub timestamp: Option<NaiveDateTime>,
}

/// Movement about to be appended to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub account: String,
    pub timestamp: NaiveDateTime,
    pub kind: MovementKind,
    /// Unsigned magnitude, strictly positive
    pub amount: Decimal,
    pub balance_after: Decimal,
}

/// Posted movement
///
/// Immutable once stored. `balance_after` is the account balance right after
/// this movement was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub id: MovementId,
    pub account: String,
    pub timestamp: NaiveDateTime,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
}

impl Movement {
    /// Stamp a new movement with its assigned id
    pub fn from_new(id: MovementId, new: NewMovement) -> Self {
        Movement {
            id,
            account: new.account,
            timestamp: new.timestamp,
            kind: new.kind,
            amount: new.amount,
            balance_after: new.balance_after,
        }
    }

    /// Amount with the sign of its kind: negative for debits
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Caller-facing shape of a movement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementView {
    pub id: MovementId,
    pub account_number: String,
    pub timestamp: NaiveDateTime,
    pub kind: MovementKind,
    pub signed_amount: Decimal,
    pub balance_after: Decimal,
}

impl From<&Movement> for MovementView {
    fn from(movement: &Movement) -> Self {
        MovementView {
            id: movement.id,
            account_number: movement.account.clone(),
            timestamp: movement.timestamp,
            kind: movement.kind,
            signed_amount: movement.signed_amount(),
            balance_after: movement.balance_after,
        }
    }
}

impl From<Movement> for MovementView {
    fn from(movement: Movement) -> Self {
        MovementView::from(&movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("credit", MovementKind::Credit)]
    #[case("DEBIT", MovementKind::Debit)]
    #[case("Credito", MovementKind::Credit)]
    #[case(" debito ", MovementKind::Debit)]
    fn test_kind_parsing(#[case] input: &str, #[case] expected: MovementKind) {
        assert_eq!(input.parse::<MovementKind>().unwrap(), expected);
    }

    #[test]
    fn test_kind_parsing_rejects_unknown() {
        let result = "transfer".parse::<MovementKind>();
        assert_eq!(
            result.unwrap_err(),
            LedgerError::InvalidMovementKind {
                kind: "transfer".to_string()
            }
        );
    }

    #[rstest]
    #[case(MovementKind::Credit, dec!(25), dec!(25))]
    #[case(MovementKind::Credit, dec!(-25), dec!(25))]
    #[case(MovementKind::Debit, dec!(50), dec!(-50))]
    #[case(MovementKind::Debit, dec!(-50), dec!(-50))]
    fn test_signed_ignores_input_sign(
        #[case] kind: MovementKind,
        #[case] amount: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(kind.signed(amount), expected);
    }

    #[test]
    fn test_view_exposes_signed_amount() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let movement = Movement::from_new(
            5,
            NewMovement {
                account: "123".to_string(),
                timestamp,
                kind: MovementKind::Debit,
                amount: dec!(40),
                balance_after: dec!(60),
            },
        );

        let view = MovementView::from(&movement);

        assert_eq!(view.id, 5);
        assert_eq!(view.account_number, "123");
        assert_eq!(view.signed_amount, dec!(-40));
        assert_eq!(view.balance_after, dec!(60));
    }
}
