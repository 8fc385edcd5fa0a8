use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{
    format_amount, parse_amount, Account, AccountNumber, Pin, Transaction, CURRENCY_SYMBOL,
};

/// StreamBank - a toy bank ledger
#[derive(Parser)]
#[command(name = "streambank")]
#[command(about = "Create an account, log in with your PIN, deposit and withdraw")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(
        short,
        long,
        global = true,
        env = "STREAMBANK_DATABASE",
        default_value = "streambank.db"
    )]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Open a new account
    Create {
        /// Your name
        #[arg(long)]
        name: String,

        /// Your age
        #[arg(long)]
        age: u32,

        /// Your email
        #[arg(long)]
        email: String,

        /// A 4-digit PIN
        #[arg(long)]
        pin: Pin,
    },

    /// Check an account number and PIN
    Login {
        /// Account number
        account: AccountNumber,

        /// 4-digit PIN
        #[arg(long)]
        pin: Pin,
    },

    /// Show account details and current balance
    Dashboard {
        /// Account number
        account: AccountNumber,

        /// 4-digit PIN
        #[arg(long)]
        pin: Pin,
    },

    /// Deposit money
    Deposit {
        /// Amount to deposit (whole units, e.g. "500")
        amount: String,

        /// Account number
        #[arg(short, long)]
        account: AccountNumber,

        /// 4-digit PIN
        #[arg(long)]
        pin: Pin,
    },

    /// Withdraw money
    Withdraw {
        /// Amount to withdraw (whole units, e.g. "500")
        amount: String,

        /// Account number
        #[arg(short, long)]
        account: AccountNumber,

        /// 4-digit PIN
        #[arg(long)]
        pin: Pin,
    },

    /// List deposits and withdrawals for an account
    Statement {
        /// Account number
        account: AccountNumber,

        /// 4-digit PIN
        #[arg(long)]
        pin: Pin,

        /// Only show the most recent N entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Verify that every balance matches its journal
    Check,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Create {
                name,
                age,
                email,
                pin,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let created = service.create_account(&name, age, &email, pin).await?;
                println!("{}", created.message);
                println!("Your Account Number: {}", created.account.account_number);
            }

            Commands::Login { account, pin } => {
                let service = LedgerService::connect(&self.database).await?;
                match service.find_user(account, pin).await? {
                    Some(user) => {
                        println!("Login Successful!");
                        println!("Logged in as: {}", user.name);
                    }
                    None => anyhow::bail!("Invalid Account Number or PIN."),
                }
            }

            Commands::Dashboard { account, pin } => {
                let service = LedgerService::connect(&self.database).await?;
                let user = service
                    .find_user(account, pin)
                    .await?
                    .context("Invalid Account Number or PIN.")?;
                print_dashboard(&user);
            }

            Commands::Deposit {
                amount,
                account,
                pin,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '500' or '1,500'")?;
                let result = service.deposit(account, pin, amount).await?;
                println!("{}", result.message);
            }

            Commands::Withdraw {
                amount,
                account,
                pin,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '500' or '1,500'")?;
                let result = service.withdraw(account, pin, amount).await?;
                println!("{}", result.message);
            }

            Commands::Statement {
                account,
                pin,
                limit,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let transactions = service.statement(account, pin, limit).await?;
                print_statement(&transactions, &format)?;
            }

            Commands::Check => {
                let service = LedgerService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }
        }

        Ok(())
    }
}

fn print_dashboard(user: &Account) {
    println!("Account Number:  {}", user.account_number);
    println!("Name:            {}", user.name);
    println!("Email:           {}", user.email);
    println!("Age:             {}", user.age);
    println!(
        "Member since:    {}",
        user.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!(
        "Current Balance: {} {}",
        CURRENCY_SYMBOL,
        format_amount(user.balance)
    );
}

fn print_statement(transactions: &[Transaction], format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(transactions)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for tx in transactions {
                writer.serialize(tx).context("Failed to write CSV row")?;
            }
            writer.flush()?;
        }
        "table" => {
            if transactions.is_empty() {
                println!("No transactions yet.");
                return Ok(());
            }
            println!(
                "{:<6} {:<20} {:<11} {:>14} {:>14}",
                "SEQ", "DATE", "TYPE", "AMOUNT", "BALANCE"
            );
            println!("{}", "-".repeat(69));
            for tx in transactions {
                println!(
                    "{:<6} {:<20} {:<11} {:>14} {:>14}",
                    tx.sequence,
                    tx.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    tx.kind,
                    format_amount(tx.signed_amount()),
                    format_amount(tx.balance_after)
                );
            }
        }
        other => anyhow::bail!("Unknown format '{}'. Use table, json or csv", other),
    }
    Ok(())
}

async fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = service.check_integrity().await?;

    println!("Accounts:     {}", report.account_count);
    println!("Transactions: {}", report.transaction_count);
    println!(
        "Deposits held: {} {}",
        CURRENCY_SYMBOL,
        format_amount(report.total_deposits)
    );
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}
