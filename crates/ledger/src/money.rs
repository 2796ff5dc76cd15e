use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::LedgerError;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for all monetary values in the ledger (movement totals and
/// the running balance) to avoid floating-point drift. Movement totals are
/// non-negative; the sign of their effect on the balance is derived from the
/// movement kind, never stored here.
///
/// # Examples
///
/// ```rust
/// use ledger::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "S/ 12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use ledger::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// The bare decimal rendering without the currency marker (`"120.50"`).
    #[must_use]
    pub fn decimal_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl fmt::Display for Amount {
    /// Formats in the soles convention used across the app: `S/ 12.34`,
    /// sign ahead of the currency marker for negatives.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}S/ {}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. Rejects empty strings and more than two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidAmount(s.trim().to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidAmount("empty amount".to_string()));
        }

        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits = digits.replace(',', ".");
        let (units_str, frac_str) = match digits.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (digits.as_str(), ""),
        };

        if units_str.is_empty() || !units_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => frac_str.parse::<i64>().map_err(|_| invalid())?,
            _ => {
                return Err(LedgerError::InvalidAmount("too many decimals".to_string()));
            }
        };

        let overflow = || LedgerError::InvalidAmount("amount too large".to_string());
        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Amount(signed))
    }
}

impl Serialize for Amount {
    /// Serializes as a canonical decimal string (`"120.50"`).
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.decimal_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Deserializes from a JSON number or a numeric string, the same
    /// coercion rule the wire decode boundary applies.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(value) => {
                let cents = (value * 100.0).round();
                if cents.is_finite() && cents.abs() < i64::MAX as f64 {
                    Ok(Amount(cents as i64))
                } else {
                    Err(D::Error::custom("amount out of range"))
                }
            }
            Wire::Text(raw) => raw.parse::<Amount>().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_soles() {
        assert_eq!(Amount::new(0).to_string(), "S/ 0.00");
        assert_eq!(Amount::new(1).to_string(), "S/ 0.01");
        assert_eq!(Amount::new(10).to_string(), "S/ 0.10");
        assert_eq!(Amount::new(12_050).to_string(), "S/ 120.50");
        assert_eq!(Amount::new(-12_050).to_string(), "-S/ 120.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Amount>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
        assert!("12a".parse::<Amount>().is_err());
        assert!(".".parse::<Amount>().is_err());
    }

    #[test]
    fn serde_coerces_strings() {
        let from_number: Amount = serde_json::from_str("120.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"120.50\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"120.50\"");
    }
}
