// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use streambank::application::LedgerService;
use streambank::domain::{Account, Pin};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Parse a PIN literal
pub fn pin(s: &str) -> Pin {
    s.parse().unwrap()
}

/// Test fixture: standard customers
pub struct Customers;

impl Customers {
    pub const ASHA_PIN: &'static str = "1234";
    pub const RAVI_PIN: &'static str = "0042";

    pub async fn asha(service: &LedgerService) -> Result<Account> {
        let created = service
            .create_account("Asha", 29, "asha@example.com", pin(Self::ASHA_PIN))
            .await?;
        Ok(created.account)
    }

    pub async fn ravi(service: &LedgerService) -> Result<Account> {
        let created = service
            .create_account("Ravi", 41, "ravi@example.com", pin(Self::RAVI_PIN))
            .await?;
        Ok(created.account)
    }

    /// Asha with an opening deposit
    pub async fn funded_asha(service: &LedgerService, amount: i64) -> Result<Account> {
        let account = Self::asha(service).await?;
        let result = service
            .deposit(account.account_number, pin(Self::ASHA_PIN), amount)
            .await?;
        Ok(result.account)
    }
}
