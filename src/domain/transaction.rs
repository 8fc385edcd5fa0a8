use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountNumber, Amount};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }

    /// Signed effect of `amount` on the account balance.
    pub fn signed(&self, amount: Amount) -> Amount {
        match self {
            TransactionKind::Deposit => amount,
            TransactionKind::Withdrawal => -amount,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal entry for one balance movement.
/// Entries are never edited; the stored balance must always equal the sum of
/// the account's entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing across the whole ledger
    pub sequence: i64,
    pub account_number: AccountNumber,
    pub kind: TransactionKind,
    /// Always positive
    pub amount: Amount,
    /// Account balance right after this entry was applied
    pub balance_after: Amount,
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a journal entry. Sequence number must be assigned by the repository.
    pub fn new(
        account_number: AccountNumber,
        kind: TransactionKind,
        amount: Amount,
        balance_after: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            account_number,
            kind,
            amount,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    pub fn signed_amount(&self) -> Amount {
        self.kind.signed(self.amount)
    }
}
