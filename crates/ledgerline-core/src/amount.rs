//! Decimal asset amounts.
//!
//! An amount is a non-negative decimal string. Its value is the integer
//! formed by the digits with the decimal point removed, bounded by
//! 2^256 - 1; its precision is the number of fractional digits.

use primitive_types::U256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::grammar;

/// Why an amount string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("malformed amount {0:?}")]
    Malformed(String),

    #[error("amount {0:?} exceeds 2^256 - 1")]
    Overflow(String),

    #[error("amount {0:?} has more than 255 fractional digits")]
    PrecisionTooLarge(String),
}

/// A parsed decimal amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    value: U256,
    precision: u8,
}

impl Amount {
    /// Parse a decimal amount string.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        if !grammar::is_valid_amount_syntax(s) {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let (digits, precision) = match s.split_once('.') {
            Some((int_part, frac_part)) => {
                let precision = u8::try_from(frac_part.len())
                    .map_err(|_| AmountError::PrecisionTooLarge(s.to_string()))?;
                (format!("{}{}", int_part, frac_part), precision)
            }
            None => (s.to_string(), 0),
        };

        let value =
            U256::from_dec_str(&digits).map_err(|_| AmountError::Overflow(s.to_string()))?;

        Ok(Self { value, precision })
    }

    /// The integer value with the decimal point removed.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Number of fractional digits.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.value.to_string();
        let precision = self.precision as usize;
        if precision == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{:0>width$}", digits, width = precision + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - precision);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U256_MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";
    const U256_MAX_PLUS_ONE: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639936";

    #[test]
    fn test_parse_integer() {
        let a = Amount::parse("100").unwrap();
        assert_eq!(a.value(), U256::from(100u64));
        assert_eq!(a.precision(), 0);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_parse_fraction() {
        let a = Amount::parse("10.25").unwrap();
        assert_eq!(a.value(), U256::from(1025u64));
        assert_eq!(a.precision(), 2);

        let a = Amount::parse(".5").unwrap();
        assert_eq!(a.value(), U256::from(5u64));
        assert_eq!(a.precision(), 1);
    }

    #[test]
    fn test_zero() {
        assert!(Amount::parse("0").unwrap().is_zero());
        assert!(Amount::parse("0.000").unwrap().is_zero());
    }

    #[test]
    fn test_ceiling() {
        assert_eq!(Amount::parse(U256_MAX).unwrap().value(), U256::MAX);

        let with_point = format!("{}.{}", &U256_MAX[..40], &U256_MAX[40..]);
        let a = Amount::parse(&with_point).unwrap();
        assert_eq!(a.value(), U256::MAX);
        assert_eq!(a.precision() as usize, U256_MAX.len() - 40);

        assert!(matches!(
            Amount::parse(U256_MAX_PLUS_ONE),
            Err(AmountError::Overflow(_))
        ));
        let with_point = format!("{}.{}", &U256_MAX_PLUS_ONE[..1], &U256_MAX_PLUS_ONE[1..]);
        assert!(matches!(
            Amount::parse(&with_point),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_malformed() {
        for bad in ["", "abc", "1.", "-5", "1.2.3"] {
            assert!(matches!(Amount::parse(bad), Err(AmountError::Malformed(_))));
        }
    }

    #[test]
    fn test_precision_too_large() {
        let s = format!("0.{}", "0".repeat(256));
        assert!(matches!(
            Amount::parse(&s),
            Err(AmountError::PrecisionTooLarge(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::parse("10.25").unwrap().to_string(), "10.25");
        assert_eq!(Amount::parse(".05").unwrap().to_string(), "0.05");
        assert_eq!(Amount::parse("007").unwrap().to_string(), "7");
    }
}
