//! Exact monetary amounts stored as whole cents.

use std::fmt;

use crate::errors::{LedgerError, Result};

/// Prefix used when an amount is persisted.
pub const CURRENCY_PREFIX: char = '$';

pub const NEGATIVE_AMOUNT_MESSAGE: &str = "Number should not be negative";

/// A non-negative amount of money with cent precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// Parses a bare number typed by the user, e.g. `3`, `3.5` or `12.40`.
    pub fn parse_input(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let cents = parse_cents(digits).ok_or_else(|| {
            LedgerError::validation(format!("invalid amount `{}` (use e.g. 12 or 12.50)", raw))
        })?;
        if negative && cents > 0 {
            return Err(LedgerError::validation(NEGATIVE_AMOUNT_MESSAGE));
        }
        Ok(Self(cents))
    }

    /// Parses the persisted form, which always carries the currency prefix.
    pub fn parse_stored(raw: &str) -> Option<Self> {
        raw.strip_prefix(CURRENCY_PREFIX)
            .and_then(parse_cents)
            .map(Self)
    }

    /// Renders the persisted form, e.g. `$12` or `$12.50`.
    pub fn to_stored(self) -> String {
        format!("{}{}", CURRENCY_PREFIX, self)
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / 100;
        let cents = self.0 % 100;
        if cents == 0 {
            write!(f, "{}", units)
        } else {
            write!(f, "{}.{:02}", units, cents)
        }
    }
}

fn parse_cents(text: &str) -> Option<u64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 || text.ends_with('.') {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    units.checked_mul(100)?.checked_add(cents)
}
