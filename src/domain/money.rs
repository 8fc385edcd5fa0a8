use std::fmt;

/// Money is held as a whole number of currency units (rupees in the UI).
/// The bank never deals in fractions, so deposits and withdrawals are integers.
pub type Amount = i64;

/// Symbol printed in front of formatted amounts.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with thousands separators.
/// Example: 1500 -> "1,500", -1234567 -> "-1,234,567"
pub fn format_amount(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Parse a user supplied amount.
/// Accepts plain integers with optional `,` or `_` separators: "500", "1,500".
/// A trailing ".0"/".00" is tolerated; any other fraction is rejected.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c == '0') {
            return Err(ParseAmountError::Fractional);
        }
    }

    let cleaned: String = whole.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    Fractional,
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::Fractional => write!(f, "amount must be a whole number"),
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
