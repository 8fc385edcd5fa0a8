use std::collections::HashMap;

use super::{Account, AccountNumber, Amount, Transaction};

/// Replay journal entries into a balance per account.
pub fn compute_balances(transactions: &[Transaction]) -> HashMap<AccountNumber, Amount> {
    let mut balances: HashMap<AccountNumber, Amount> = HashMap::new();

    for tx in transactions {
        *balances.entry(tx.account_number).or_insert(0) += tx.signed_amount();
    }

    balances
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    BalanceMismatch {
        account_number: AccountNumber,
        stored: Amount,
        computed: Amount,
    },
    NegativeBalance {
        account_number: AccountNumber,
        balance: Amount,
    },
    NonPositiveAmounts(i64),
    OrphanTransactions(i64),
    SequenceGaps,
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::BalanceMismatch {
                account_number,
                stored,
                computed,
            } => write!(
                f,
                "Account {}: stored balance {} does not match journal total {}",
                account_number, stored, computed
            ),
            IntegrityIssue::NegativeBalance {
                account_number,
                balance,
            } => write!(f, "Account {} has negative balance {}", account_number, balance),
            IntegrityIssue::NonPositiveAmounts(n) => {
                write!(f, "{} transaction(s) with non-positive amount", n)
            }
            IntegrityIssue::OrphanTransactions(n) => {
                write!(f, "{} transaction(s) reference unknown accounts", n)
            }
            IntegrityIssue::SequenceGaps => write!(f, "Transaction sequence has gaps"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub account_count: i64,
    pub transaction_count: i64,
    /// Sum of all stored balances
    pub total_deposits: Amount,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compare stored balances against the journal and collect every issue found.
pub fn build_integrity_report(
    accounts: &[Account],
    computed: &HashMap<AccountNumber, Amount>,
    transaction_count: i64,
    has_sequence_gaps: bool,
    orphan_transactions: i64,
    non_positive_amounts: i64,
) -> IntegrityReport {
    let mut issues = Vec::new();

    for account in accounts {
        let journal = computed.get(&account.account_number).copied().unwrap_or(0);
        if journal != account.balance {
            issues.push(IntegrityIssue::BalanceMismatch {
                account_number: account.account_number,
                stored: account.balance,
                computed: journal,
            });
        }
        if account.balance < 0 {
            issues.push(IntegrityIssue::NegativeBalance {
                account_number: account.account_number,
                balance: account.balance,
            });
        }
    }

    if non_positive_amounts > 0 {
        issues.push(IntegrityIssue::NonPositiveAmounts(non_positive_amounts));
    }
    if orphan_transactions > 0 {
        issues.push(IntegrityIssue::OrphanTransactions(orphan_transactions));
    }
    if has_sequence_gaps {
        issues.push(IntegrityIssue::SequenceGaps);
    }

    IntegrityReport {
        account_count: accounts.len() as i64,
        transaction_count,
        total_deposits: accounts.iter().map(|a| a.balance).sum(),
        issues,
    }
}
