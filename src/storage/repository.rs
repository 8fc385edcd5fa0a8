use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Account, AccountNumber, Pin, Transaction, TransactionKind};

use super::MIGRATION_001_INITIAL;

/// Statistics for ledger integrity verification.
#[derive(Debug, Clone)]
pub struct IntegrityStats {
    pub transaction_count: i64,
    pub has_sequence_gaps: bool,
    pub orphan_transactions: i64,
    pub non_positive_amounts: i64,
}

/// Repository for persisting and querying accounts and their journal.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        debug!(database_url, "connected to database");
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run more than once.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Save a new account, assigning it the next account number.
    pub async fn save_account(&self, account: &mut Account) -> Result<()> {
        let mut db_tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'account_number'
            RETURNING value
            "#,
        )
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to allocate account number")?;
        account.account_number = row.get("value");

        sqlx::query(
            r#"
            INSERT INTO accounts (account_number, name, age, email, pin, balance, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.account_number)
        .bind(&account.name)
        .bind(i64::from(account.age))
        .bind(&account.email)
        .bind(i64::from(account.pin.value()))
        .bind(account.balance)
        .bind(account.created_at.to_rfc3339())
        .execute(&mut *db_tx)
        .await
        .context("Failed to save account")?;

        db_tx.commit().await.context("Failed to commit account")?;
        debug!(account_number = account.account_number, "saved account");
        Ok(())
    }

    /// Get an account by number.
    pub async fn get_account(&self, account_number: AccountNumber) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT account_number, name, age, email, pin, balance, created_at
            FROM accounts
            WHERE account_number = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// List all accounts ordered by account number.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            "SELECT account_number, name, age, email, pin, balance, created_at FROM accounts ORDER BY account_number",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let age: i64 = row.get("age");
        let pin: i64 = row.get("pin");
        let created_at_str: String = row.get("created_at");

        let pin = u16::try_from(pin)
            .ok()
            .and_then(|p| Pin::new(p).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid stored PIN"))?;

        Ok(Account {
            account_number: row.get("account_number"),
            name: row.get("name"),
            age: u32::try_from(age).context("Invalid stored age")?,
            email: row.get("email"),
            pin,
            balance: row.get("balance"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Append a journal entry and set the account balance to `balance_after`
    /// in one database transaction. Assigns the next sequence number.
    pub async fn apply_transaction(&self, tx: &mut Transaction) -> Result<()> {
        let mut db_tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'transaction_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&mut *db_tx)
        .await
        .context("Failed to get next sequence number")?;
        tx.sequence = row.get("value");

        let updated = sqlx::query("UPDATE accounts SET balance = ? WHERE account_number = ?")
            .bind(tx.balance_after)
            .bind(tx.account_number)
            .execute(&mut *db_tx)
            .await
            .context("Failed to update balance")?;

        if updated.rows_affected() != 1 {
            anyhow::bail!("Account {} disappeared during update", tx.account_number);
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, account_number, kind, amount, balance_after, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.to_string())
        .bind(tx.sequence)
        .bind(tx.account_number)
        .bind(tx.kind.as_str())
        .bind(tx.amount)
        .bind(tx.balance_after)
        .bind(tx.recorded_at.to_rfc3339())
        .execute(&mut *db_tx)
        .await
        .context("Failed to save transaction")?;

        db_tx.commit().await.context("Failed to commit transaction")?;
        debug!(
            account_number = tx.account_number,
            sequence = tx.sequence,
            kind = tx.kind.as_str(),
            amount = tx.amount,
            "applied transaction"
        );
        Ok(())
    }

    /// List journal entries for an account, oldest first.
    /// With a limit, only the most recent `limit` entries are returned.
    pub async fn list_transactions_for_account(
        &self,
        account_number: AccountNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>> {
        let mut query = String::from(
            "SELECT id, sequence, account_number, kind, amount, balance_after, recorded_at FROM transactions WHERE account_number = ? ORDER BY sequence DESC",
        );
        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
        }

        let rows = sqlx::query(&query)
            .bind(account_number)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions for account")?;

        let mut transactions = rows
            .iter()
            .map(Self::row_to_transaction)
            .collect::<Result<Vec<_>>>()?;
        transactions.reverse();
        Ok(transactions)
    }

    /// List every journal entry, ordered by sequence number.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            "SELECT id, sequence, account_number, kind, amount, balance_after, recorded_at FROM transactions ORDER BY sequence",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            account_number: row.get("account_number"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            amount: row.get("amount"),
            balance_after: row.get("balance_after"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    /// Get statistics for integrity checking.
    pub async fn get_integrity_stats(&self) -> Result<IntegrityStats> {
        let sequence_check = sqlx::query(
            r#"
            SELECT
                MIN(sequence) as min_seq,
                MAX(sequence) as max_seq,
                COUNT(*) as count
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to check transaction sequence")?;

        let min_seq: Option<i64> = sequence_check.get("min_seq");
        let max_seq: Option<i64> = sequence_check.get("max_seq");
        let transaction_count: i64 = sequence_check.get("count");

        let has_sequence_gaps = match (min_seq, max_seq) {
            (Some(min), Some(max)) => min != 1 || (max - min + 1) != transaction_count,
            _ => false,
        };

        let orphan_transactions: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM transactions t
            WHERE NOT EXISTS (SELECT 1 FROM accounts a WHERE a.account_number = t.account_number)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count orphan transactions")?
        .get("count");

        let non_positive_amounts: i64 =
            sqlx::query("SELECT COUNT(*) as count FROM transactions WHERE amount <= 0")
                .fetch_one(&self.pool)
                .await
                .context("Failed to count invalid amounts")?
                .get("count");

        Ok(IntegrityStats {
            transaction_count,
            has_sequence_gaps,
            orphan_transactions,
            non_positive_amounts,
        })
    }
}
