mod common;

use anyhow::Result;
use common::{pin, test_service, Customers};
use streambank::application::AppError;
use streambank::domain::TransactionKind;

#[tokio::test]
async fn test_deposit_increases_balance_by_exact_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::asha(&service).await?;
    let asha_pin = pin(Customers::ASHA_PIN);

    let result = service.deposit(account.account_number, asha_pin, 500).await?;
    assert_eq!(result.account.balance, 500);
    assert_eq!(result.transaction.kind, TransactionKind::Deposit);
    assert_eq!(result.transaction.amount, 500);
    assert_eq!(result.transaction.balance_after, 500);
    assert!(result.message.contains("deposited"));

    let result = service.deposit(account.account_number, asha_pin, 1250).await?;
    assert_eq!(result.account.balance, 1750);

    let stored = service
        .find_user(account.account_number, asha_pin)
        .await?
        .unwrap();
    assert_eq!(stored.balance, 1750);

    Ok(())
}

#[tokio::test]
async fn test_deposit_rejects_zero_and_negative() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::funded_asha(&service, 100).await?;
    let asha_pin = pin(Customers::ASHA_PIN);

    for amount in [0, -1, -500] {
        let result = service.deposit(account.account_number, asha_pin, amount).await;
        assert!(
            matches!(result, Err(AppError::InvalidAmount(_))),
            "deposit of {} should fail",
            amount
        );
    }

    let stored = service
        .find_user(account.account_number, asha_pin)
        .await?
        .unwrap();
    assert_eq!(stored.balance, 100, "Failed deposits must not touch the balance");

    Ok(())
}

#[tokio::test]
async fn test_deposit_requires_valid_pin() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::asha(&service).await?;

    let result = service.deposit(account.account_number, pin("9999"), 100).await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed)));

    let result = service
        .deposit(account.account_number + 1, pin(Customers::ASHA_PIN), 100)
        .await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed)));

    Ok(())
}

#[tokio::test]
async fn test_withdraw_decreases_balance_by_exact_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::funded_asha(&service, 1000).await?;
    let asha_pin = pin(Customers::ASHA_PIN);

    let result = service.withdraw(account.account_number, asha_pin, 300).await?;
    assert_eq!(result.account.balance, 700);
    assert_eq!(result.transaction.kind, TransactionKind::Withdrawal);
    assert!(result.message.contains("withdrawn"));

    // Withdrawing the full remaining balance is allowed
    let result = service.withdraw(account.account_number, asha_pin, 700).await?;
    assert_eq!(result.account.balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_withdraw_more_than_balance_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::funded_asha(&service, 200).await?;
    let asha_pin = pin(Customers::ASHA_PIN);

    let result = service.withdraw(account.account_number, asha_pin, 201).await;
    match result {
        Err(AppError::InsufficientFunds { balance, required }) => {
            assert_eq!(balance, 200);
            assert_eq!(required, 201);
        }
        other => panic!("expected InsufficientFunds, got {:?}", other.err()),
    }

    let stored = service
        .find_user(account.account_number, asha_pin)
        .await?
        .unwrap();
    assert_eq!(stored.balance, 200);

    Ok(())
}

#[tokio::test]
async fn test_withdraw_rejects_non_positive_and_bad_pin() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::funded_asha(&service, 200).await?;

    let result = service
        .withdraw(account.account_number, pin(Customers::ASHA_PIN), 0)
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    let result = service
        .withdraw(account.account_number, pin(Customers::ASHA_PIN), -50)
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    let result = service.withdraw(account.account_number, pin("0000"), 50).await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed)));

    Ok(())
}

#[tokio::test]
async fn test_accounts_are_isolated() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let asha = Customers::funded_asha(&service, 500).await?;
    let ravi = Customers::ravi(&service).await?;

    service
        .deposit(ravi.account_number, pin(Customers::RAVI_PIN), 80)
        .await?;

    // Ravi's PIN does not open Asha's account
    let result = service
        .withdraw(asha.account_number, pin(Customers::RAVI_PIN), 10)
        .await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed)));

    let asha = service
        .find_user(asha.account_number, pin(Customers::ASHA_PIN))
        .await?
        .unwrap();
    let ravi = service
        .find_user(ravi.account_number, pin(Customers::RAVI_PIN))
        .await?
        .unwrap();
    assert_eq!(asha.balance, 500);
    assert_eq!(ravi.balance, 80);

    Ok(())
}

#[tokio::test]
async fn test_statement_lists_journal_in_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Customers::asha(&service).await?;
    let asha_pin = pin(Customers::ASHA_PIN);

    service.deposit(account.account_number, asha_pin, 1000).await?;
    service.withdraw(account.account_number, asha_pin, 250).await?;
    service.deposit(account.account_number, asha_pin, 40).await?;
    // A rejected withdrawal leaves no trace
    let _ = service.withdraw(account.account_number, asha_pin, 10_000).await;

    let statement = service.statement(account.account_number, asha_pin, None).await?;
    assert_eq!(statement.len(), 3);
    assert_eq!(
        statement.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Deposit
        ]
    );
    assert_eq!(
        statement.iter().map(|t| t.balance_after).collect::<Vec<_>>(),
        vec![1000, 750, 790]
    );
    assert!(statement.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let recent = service
        .statement(account.account_number, asha_pin, Some(2))
        .await?;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].balance_after, 750);
    assert_eq!(recent[1].balance_after, 790);

    let result = service.statement(account.account_number, pin("1111"), None).await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed)));

    Ok(())
}
