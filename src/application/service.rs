use tracing::{info, warn};

use crate::domain::{
    build_integrity_report, compute_balances, format_amount, Account, AccountNumber, Amount,
    IntegrityReport, Pin, Transaction, TransactionKind, CURRENCY_SYMBOL,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger operations.
/// This is the only interface clients (CLI, tests, a future UI) should use.
pub struct LedgerService {
    repo: Repository,
}

/// Result of creating an account
pub struct AccountCreated {
    pub account: Account,
    pub message: String,
}

/// Result of a deposit or withdrawal
pub struct TransactionResult {
    /// The account as it stands after the operation
    pub account: Account,
    pub transaction: Transaction,
    pub message: String,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a database at the given path, creating the file if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account with a zero balance.
    pub async fn create_account(
        &self,
        name: &str,
        age: u32,
        email: &str,
        pin: Pin,
    ) -> Result<AccountCreated, AppError> {
        let name = required("Name", name)?;
        let email = required("Email", email)?;

        let mut account = Account::new(name, age, email, pin);
        self.repo.save_account(&mut account).await?;

        info!(account_number = account.account_number, "account created");
        let message = format!(
            "Account created successfully! Your account number is {}.",
            account.account_number
        );
        Ok(AccountCreated { account, message })
    }

    /// Look up an account by number and PIN.
    /// Returns `None` when the number is unknown or the PIN does not match.
    pub async fn find_user(
        &self,
        account_number: AccountNumber,
        pin: Pin,
    ) -> Result<Option<Account>, AppError> {
        let account = self
            .repo
            .get_account(account_number)
            .await?
            .filter(|account| account.verify_pin(pin));

        if account.is_none() {
            warn!(account_number, "authentication failed");
        }
        Ok(account)
    }

    // ========================
    // Balance operations
    // ========================

    /// Add `amount` to the balance. The amount must be positive.
    pub async fn deposit(
        &self,
        account_number: AccountNumber,
        pin: Pin,
        amount: Amount,
    ) -> Result<TransactionResult, AppError> {
        let mut account = self.authenticate(account_number, pin).await?;
        ensure_positive(amount)?;

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::InvalidAmount("deposit would overflow the balance".into()))?;

        let mut transaction =
            Transaction::new(account_number, TransactionKind::Deposit, amount, new_balance);
        self.repo.apply_transaction(&mut transaction).await?;
        account.balance = new_balance;

        info!(account_number, amount, balance = new_balance, "deposit posted");
        let message = format!(
            "{} {} deposited successfully. New balance: {} {}",
            CURRENCY_SYMBOL,
            format_amount(amount),
            CURRENCY_SYMBOL,
            format_amount(new_balance)
        );
        Ok(TransactionResult {
            account,
            transaction,
            message,
        })
    }

    /// Take `amount` out of the balance. Fails if it exceeds the balance.
    pub async fn withdraw(
        &self,
        account_number: AccountNumber,
        pin: Pin,
        amount: Amount,
    ) -> Result<TransactionResult, AppError> {
        let mut account = self.authenticate(account_number, pin).await?;
        ensure_positive(amount)?;

        if !account.can_withdraw(amount) {
            warn!(account_number, amount, balance = account.balance, "withdrawal rejected");
            return Err(AppError::InsufficientFunds {
                balance: account.balance,
                required: amount,
            });
        }

        let new_balance = account.balance - amount;
        let mut transaction =
            Transaction::new(account_number, TransactionKind::Withdrawal, amount, new_balance);
        self.repo.apply_transaction(&mut transaction).await?;
        account.balance = new_balance;

        info!(account_number, amount, balance = new_balance, "withdrawal posted");
        let message = format!(
            "{} {} withdrawn successfully. New balance: {} {}",
            CURRENCY_SYMBOL,
            format_amount(amount),
            CURRENCY_SYMBOL,
            format_amount(new_balance)
        );
        Ok(TransactionResult {
            account,
            transaction,
            message,
        })
    }

    /// Journal entries for an account, oldest first.
    /// With a limit, only the most recent `limit` entries are returned.
    pub async fn statement(
        &self,
        account_number: AccountNumber,
        pin: Pin,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, AppError> {
        self.authenticate(account_number, pin).await?;
        Ok(self
            .repo
            .list_transactions_for_account(account_number, limit)
            .await?)
    }

    // ========================
    // Integrity operations
    // ========================

    /// Replay the journal and compare it with every stored balance.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let stats = self.repo.get_integrity_stats().await?;
        let accounts = self.repo.list_accounts().await?;
        let transactions = self.repo.list_transactions().await?;

        let report = build_integrity_report(
            &accounts,
            &compute_balances(&transactions),
            stats.transaction_count,
            stats.has_sequence_gaps,
            stats.orphan_transactions,
            stats.non_positive_amounts,
        );

        if !report.is_healthy() {
            warn!(issues = report.issues.len(), "ledger integrity check failed");
        }
        Ok(report)
    }

    async fn authenticate(
        &self,
        account_number: AccountNumber,
        pin: Pin,
    ) -> Result<Account, AppError> {
        self.find_user(account_number, pin)
            .await?
            .ok_or(AppError::AuthenticationFailed)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::MissingField(field));
    }
    Ok(value.to_string())
}

fn ensure_positive(amount: Amount) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(())
}
