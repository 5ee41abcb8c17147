//! Money type for representing monetary values.
//!
//! Amounts are integer minor units (centavos, cents) so that sums of
//! prices are exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Bolivian boliviano.
    #[default]
    BOB,
    USD,
    EUR,
    PEN,
    CLP,
}

impl Currency {
    /// Get the currency code (e.g., "BOB").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BOB => "BOB",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::PEN => "PEN",
            Currency::CLP => "CLP",
        }
    }

    /// Get the currency symbol (e.g., "Bs").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BOB => "Bs",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::PEN => "S/",
            Currency::CLP => "CLP$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "BOB" => Some(Currency::BOB),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "PEN" => Some(Currency::PEN),
            "CLP" => Some(Currency::CLP),
            _ => None,
        }
    }

    fn scale(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CommerceError::UnknownCurrency(s.to_string()))
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest
    /// minor unit. Backend prices arrive as JSON numbers.
    ///
    /// ```
    /// use salesdesk_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(10.5, Currency::BOB);
    /// assert_eq!(price.amount_cents, 1050);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.scale() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Parse a decimal string such as `"25.50"`, `"-4.5"` or `"20"` exactly.
    pub fn parse(input: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidAmount(input.to_string());

        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        let places = currency.decimal_places() as usize;
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || !all_digits(whole)
            || !all_digits(frac)
            || frac.len() > places
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = places);
            padded.parse().map_err(|_| invalid())?
        };

        let cents = whole
            .checked_mul(currency.scale())
            .and_then(|w| w.checked_add(frac))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Negate the amount.
    pub fn negate(&self) -> Self {
        Self::new(-self.amount_cents, self.currency)
    }

    /// Format as a display string (e.g., "Bs 25.50", "$49.99").
    pub fn display(&self) -> String {
        let symbol = self.currency.symbol();
        if symbol.chars().all(char::is_alphabetic) {
            format!("{} {}", symbol, self.display_amount())
        } else {
            format!("{}{}", symbol, self.display_amount())
        }
    }

    /// Format as a display string without symbol (e.g., "25.50").
    pub fn display_amount(&self) -> String {
        let scale = self.currency.scale();
        let places = self.currency.decimal_places() as usize;
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let whole = abs / scale as u64;
        if places == 0 {
            format!("{}{}", sign, whole)
        } else {
            let frac = abs % scale as u64;
            format!("{}{}.{:0places$}", sign, whole, frac)
        }
    }

    /// Add another Money value in the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|c| Money::new(c, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another Money value in the same currency.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|c| Money::new(c, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a scalar, saturating at the bounds of `i64`.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }

    fn check_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.multiply(factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
