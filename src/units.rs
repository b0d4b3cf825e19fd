//! Conversion between minimal-unit integers and decimal display amounts
//!
//! All arithmetic is done on `U256` so amounts up to 2^256 - 1 convert
//! without precision loss. No binary floating point is involved anywhere.

use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{RestakerError, Result};

/// Decimals of the chain's native asset
pub const NATIVE_DECIMALS: u8 = 18;

/// 10^18, one whole unit of the native asset
pub const WEI_PER_UNIT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 10^77 is the largest power of ten below 2^256
const MAX_POW10: u32 = 77;

fn pow10(exp: u32) -> Result<U256> {
    if exp > MAX_POW10 {
        return Err(RestakerError::AmountOverflow(format!(
            "10^{exp} does not fit in 256 bits"
        )));
    }
    Ok(U256::from(10u64).pow(U256::from(exp)))
}

fn parse_digits(digits: &str, what: &str) -> Result<U256> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RestakerError::InvalidAmount(format!(
            "{what} must be a non-negative base-10 integer, got {digits:?}"
        )));
    }
    U256::from_str_radix(digits, 10)
        .map_err(|_| RestakerError::AmountOverflow(format!("{what} {digits} exceeds 256 bits")))
}

/// Non-negative integer amount in the chain's minimal unit (wei-equivalent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinimalUnits(pub U256);

impl MinimalUnits {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| RestakerError::AmountOverflow(format!("{self} + {other}")))
    }
}

impl From<U256> for MinimalUnits {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u128> for MinimalUnits {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<u64> for MinimalUnits {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

/// Parses the canonical base-10 form, e.g. `"2500000000000000000"`
impl FromStr for MinimalUnits {
    type Err = RestakerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_digits(s.trim(), "minimal-unit amount").map(Self)
    }
}

impl fmt::Display for MinimalUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for MinimalUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Exact non-negative decimal: `mantissa / 10^places`
///
/// Always kept normalized (no trailing fractional zeros), so derived
/// equality is numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayAmount {
    mantissa: U256,
    places: u32,
}

impl DisplayAmount {
    pub fn new(mantissa: U256, places: u32) -> Self {
        let ten = U256::from(10u64);
        let mut mantissa = mantissa;
        let mut places = places;
        while places > 0 && (mantissa % ten).is_zero() {
            mantissa /= ten;
            places -= 1;
        }
        Self { mantissa, places }
    }

    pub fn from_integer(value: U256) -> Self {
        Self::new(value, 0)
    }

    pub fn mantissa(&self) -> U256 {
        self.mantissa
    }

    /// Number of fractional digits
    pub fn places(&self) -> u32 {
        self.places
    }
}

impl From<u64> for DisplayAmount {
    fn from(value: u64) -> Self {
        Self::from_integer(U256::from(value))
    }
}

/// Accepts `"10"`, `"10.4"`, `"0.000000000000000001"`; no sign, no exponent
impl FromStr for DisplayAmount {
    type Err = RestakerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() {
                    return Err(RestakerError::InvalidAmount(format!(
                        "display amount {s:?} has an empty fraction"
                    )));
                }
                (int_part, frac_part)
            }
            None => (s, ""),
        };
        parse_digits(int_part, "display amount")?;
        let digits = format!("{int_part}{frac_part}");
        let mantissa = parse_digits(&digits, "display amount")?;
        Ok(Self::new(mantissa, frac_part.len() as u32))
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let places = self.places as usize;
        if places == 0 {
            return f.write_str(&digits);
        }
        let padded = if digits.len() <= places {
            format!("{}{}", "0".repeat(places - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        write!(f, "{int_part}.{frac_part}")
    }
}

impl Serialize for DisplayAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Divide `raw` by 10^scale exactly
pub fn to_display_amount(raw: impl Into<MinimalUnits>, scale: u8) -> DisplayAmount {
    DisplayAmount::new(raw.into().0, scale as u32)
}

/// Multiply by 10^scale, truncating any digits beyond `scale`
pub fn to_minimal_unit(amount: &DisplayAmount, scale: u8) -> Result<MinimalUnits> {
    let scale = scale as u32;
    if amount.mantissa.is_zero() {
        return Ok(MinimalUnits::ZERO);
    }
    if amount.places <= scale {
        let factor = pow10(scale - amount.places)?;
        amount
            .mantissa
            .checked_mul(factor)
            .map(MinimalUnits)
            .ok_or_else(|| {
                RestakerError::AmountOverflow(format!("{amount} at scale {scale} exceeds 256 bits"))
            })
    } else {
        let drop = amount.places - scale;
        if drop > MAX_POW10 {
            return Ok(MinimalUnits::ZERO);
        }
        Ok(MinimalUnits(amount.mantissa / pow10(drop)?))
    }
}

/// Whole native units in `raw`, fractional remainder discarded
pub fn to_whole_units(raw: MinimalUnits) -> U256 {
    raw.0 / WEI_PER_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    const U256_MAX_DEC: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    fn units(s: &str) -> MinimalUnits {
        s.parse().unwrap()
    }

    fn display(s: &str) -> DisplayAmount {
        s.parse().unwrap()
    }

    #[test]
    fn test_wei_per_unit_constant() {
        assert_eq!(WEI_PER_UNIT, pow10(18).unwrap());
    }

    #[test]
    fn test_to_display_amount() {
        assert_eq!(
            to_display_amount(units("10400000000000000000"), 18).to_string(),
            "10.4"
        );
        assert_eq!(to_display_amount(units("1"), 18).to_string(), "0.000000000000000001");
        assert_eq!(to_display_amount(units("0"), 18).to_string(), "0");
        assert_eq!(to_display_amount(units("1234"), 0).to_string(), "1234");
    }

    #[test]
    fn test_to_display_amount_handles_full_u256_range() {
        let amount = to_display_amount(units(U256_MAX_DEC), 18);
        assert_eq!(
            amount.to_string(),
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
        );
        assert_eq!(to_minimal_unit(&amount, 18).unwrap(), units(U256_MAX_DEC));
    }

    #[test]
    fn test_minimal_units_rejects_non_canonical_input() {
        for bad in ["", "-1", "1e18", "0x10", "abc", "1.5", " "] {
            assert!(
                matches!(bad.parse::<MinimalUnits>(), Err(RestakerError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
        let too_big = format!("{U256_MAX_DEC}0");
        assert!(matches!(
            too_big.parse::<MinimalUnits>(),
            Err(RestakerError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_to_minimal_unit_scales_and_truncates() {
        assert_eq!(
            to_minimal_unit(&display("10.4"), 18).unwrap(),
            units("10400000000000000000")
        );
        assert_eq!(to_minimal_unit(&display("1.23456789"), 4).unwrap(), units("12345"));
        assert_eq!(to_minimal_unit(&display("0.00009"), 4).unwrap(), MinimalUnits::ZERO);
        assert_eq!(
            to_minimal_unit(&DisplayAmount::from(2), 18).unwrap(),
            units("2000000000000000000")
        );
    }

    #[test]
    fn test_to_minimal_unit_overflow_is_an_error() {
        let huge = to_display_amount(units(U256_MAX_DEC), 0);
        assert!(matches!(
            to_minimal_unit(&huge, 1),
            Err(RestakerError::AmountOverflow(_))
        ));
        assert!(matches!(
            to_minimal_unit(&display("1"), 78),
            Err(RestakerError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_display_round_trip_law() {
        let cases = [
            ("0", 18),
            ("10.4", 18),
            ("1.000000000000000001", 18),
            ("123456789.123456", 6),
            ("42", 0),
        ];
        for (x, scale) in cases {
            let x = display(x);
            let raw = to_minimal_unit(&x, scale).unwrap();
            assert_eq!(to_display_amount(raw, scale), x, "round trip at scale {scale}");
        }
    }

    #[test]
    fn test_display_amount_parsing() {
        assert_eq!(display("10.400"), display("10.4"));
        assert_eq!(display("007").to_string(), "7");
        assert_eq!(display("0.0").to_string(), "0");
        for bad in ["", ".5", "5.", "-1.0", "1e3", "1.2.3"] {
            assert!(bad.parse::<DisplayAmount>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_zero_converts_at_any_scale() {
        assert_eq!(to_minimal_unit(&display("0"), 78).unwrap(), MinimalUnits::ZERO);
        assert_eq!(to_minimal_unit(&display("0"), u8::MAX).unwrap(), MinimalUnits::ZERO);
        assert_eq!(to_minimal_unit(&display("0.0"), 18).unwrap(), MinimalUnits::ZERO);
    }

    #[test]
    fn test_to_whole_units_floors() {
        assert_eq!(to_whole_units(units("2500000000000000000")), U256::from(2));
        assert_eq!(to_whole_units(units("1999999999999999999")), U256::from(1));
        assert_eq!(to_whole_units(units("999999999999999999")), U256::ZERO);
        assert_eq!(to_whole_units(units("10400000000000000000")), U256::from(10));
    }

    #[test]
    fn test_minimal_units_checked_add() {
        let a = units("1");
        assert_eq!(a.checked_add(units("2")).unwrap(), units("3"));
        assert!(units(U256_MAX_DEC).checked_add(a).is_err());
    }
}
