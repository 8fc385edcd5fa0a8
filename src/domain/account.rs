use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Amount;

/// Account numbers are handed out sequentially by the repository.
pub type AccountNumber = i64;

/// The number given to the very first account of a fresh ledger.
pub const FIRST_ACCOUNT_NUMBER: AccountNumber = 100_000_001;

/// A 4-digit numeric credential.
///
/// Stored as a plain integer, so "0042" and 42 are the same PIN. It is always
/// displayed zero-padded to four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Pin(u16);

impl Pin {
    pub const MAX: u16 = 9999;

    pub fn new(value: u16) -> Result<Self, InvalidPinError> {
        if value > Self::MAX {
            return Err(InvalidPinError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for Pin {
    type Err = InvalidPinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPinError::NotFourDigits);
        }
        // Four ASCII digits always fit in u16.
        let value = s.parse::<u16>().map_err(|_| InvalidPinError::NotFourDigits)?;
        Self::new(value)
    }
}

impl TryFrom<u16> for Pin {
    type Error = InvalidPinError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pin> for u16 {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPinError {
    NotFourDigits,
    OutOfRange(u16),
}

impl fmt::Display for InvalidPinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPinError::NotFourDigits => write!(f, "PIN must be exactly 4 digits"),
            InvalidPinError::OutOfRange(v) => write!(f, "PIN {} has more than 4 digits", v),
        }
    }
}

impl std::error::Error for InvalidPinError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: AccountNumber,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub pin: Pin,
    /// Never negative.
    pub balance: Amount,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account with a zero balance.
    /// The account number is assigned by the repository when the account is saved.
    pub fn new(name: String, age: u32, email: String, pin: Pin) -> Self {
        Self {
            account_number: 0,
            name,
            age,
            email,
            pin,
            balance: 0,
            created_at: Utc::now(),
        }
    }

    pub fn verify_pin(&self, pin: Pin) -> bool {
        self.pin == pin
    }

    pub fn can_withdraw(&self, amount: Amount) -> bool {
        amount <= self.balance
    }
}
