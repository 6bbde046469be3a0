use crate::utils::error::{JailError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SCALE: i64 = 10_000;
const FRACTION_DIGITS: usize = 4;

/// Fixed-point amount with four fractional digits, stored as ten-thousandths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    HalfAwayFromZero,
    HalfEven,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_ten_thousandths(units: i64) -> Self {
        Self(units)
    }

    pub fn ten_thousandths(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Exact total, or `None` when it does not fit.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Parses a JSON float through its shortest decimal rendering so that
    /// `93934.2` stays exactly `93934.2`.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(JailError::InvalidMoney {
                value: value.to_string(),
            });
        }
        value.to_string().parse()
    }

    pub fn round_to_cents(self, mode: RoundingMode) -> Cents {
        let quotient = self.0 / 100;
        let remainder = (self.0 % 100).abs();
        let away = if self.0 < 0 { -1 } else { 1 };

        let rounded = match mode {
            RoundingMode::HalfAwayFromZero if remainder >= 50 => quotient + away,
            RoundingMode::HalfEven if remainder > 50 => quotient + away,
            RoundingMode::HalfEven if remainder == 50 && quotient % 2 != 0 => quotient + away,
            _ => quotient,
        };
        Cents(rounded)
    }
}

impl FromStr for Money {
    type Err = JailError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || JailError::InvalidMoney {
            value: s.to_string(),
        };

        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(invalid());
        }

        // Digits past the fourth round half away from zero.
        let (fraction, round_up) = if fraction.len() > FRACTION_DIGITS {
            let (kept, dropped) = fraction.split_at(FRACTION_DIGITS);
            (kept, dropped.as_bytes()[0] >= b'5')
        } else {
            (fraction, false)
        };

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| invalid())?
        };
        let fraction_units = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fraction, width = FRACTION_DIGITS);
            padded.parse::<i64>().map_err(|_| invalid())?
        };

        let units = whole_units
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction_units))
            .and_then(|u| u.checked_add(i64::from(round_up)))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -units } else { units }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / SCALE as u64;
        let fraction = magnitude % SCALE as u64;
        if fraction == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let fraction = format!("{:04}", fraction);
        write!(f, "{}{}.{}", sign, whole, fraction.trim_end_matches('0'))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal amount as a number or a string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Money, E> {
        value
            .checked_mul(SCALE)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount {} is out of range", value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Money, E> {
        i64::try_from(value)
            .ok()
            .and_then(|v| v.checked_mul(SCALE))
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount {} is out of range", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Money, E> {
        Money::from_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Money, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Whole cents; the output of [`Money::round_to_cents`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cents(i64);

impl Cents {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

/// Written as a bare JSON number with exactly two decimals.
impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let raw = serde_json::value::RawValue::from_string(self.to_string())
            .map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}
