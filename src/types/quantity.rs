use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ErrMode, ModalResult};
use winnow::prelude::*;

/// A numeric value with a unit suffix (e.g. `"10Gi"`), resolved to an exact
/// integer byte count at parse time.
///
/// Supported suffixes are the binary set (`Ki` through `Ei`) and the decimal
/// set (`k`, `M`, `G`, `T`, `P`, `E`). A fractional mantissa is accepted only
/// when the scaled result is integral: `"1.5Gi"` is fine, `"1.5"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i64);

/// The input could not be parsed as a quantity, or the scaled value does not
/// fit an `i64` byte count.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid quantity '{input}'")]
pub struct QuantityError {
    input: String,
}

impl Quantity {
    /// Wrap an exact byte count.
    #[must_use]
    pub fn from_bytes(bytes: i64) -> Self {
        Self(bytes)
    }

    /// The exact byte count.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        quantity
            .parse(s)
            .map(Quantity)
            .map_err(|_| QuantityError { input: s.to_owned() })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn suffix(input: &mut &str) -> ModalResult<i128> {
    alt((
        "Ki".value(1_i128 << 10),
        "Mi".value(1_i128 << 20),
        "Gi".value(1_i128 << 30),
        "Ti".value(1_i128 << 40),
        "Pi".value(1_i128 << 50),
        "Ei".value(1_i128 << 60),
        "k".value(1_000_i128),
        "M".value(1_000_000_i128),
        "G".value(1_000_000_000_i128),
        "T".value(1_000_000_000_000_i128),
        "P".value(1_000_000_000_000_000_i128),
        "E".value(1_000_000_000_000_000_000_i128),
    ))
    .parse_next(input)
}

fn quantity(input: &mut &str) -> ModalResult<i64> {
    let negative = opt('-').parse_next(input)?.is_some();
    let whole: &str = digit1.parse_next(input)?;
    let frac: Option<&str> = opt(preceded('.', digit1)).parse_next(input)?;
    let scale = opt(suffix).parse_next(input)?.unwrap_or(1);

    let frac = frac.unwrap_or("");
    let mantissa: i128 = format!("{whole}{frac}")
        .parse()
        .map_err(|_| ErrMode::from_input(input).cut())?;
    let divisor = 10_i128
        .checked_pow(u32::try_from(frac.len()).map_err(|_| ErrMode::from_input(input).cut())?)
        .ok_or_else(|| ErrMode::from_input(input).cut())?;

    let scaled = mantissa
        .checked_mul(scale)
        .ok_or_else(|| ErrMode::from_input(input).cut())?;
    if scaled % divisor != 0 {
        // Scaling did not absorb the fractional digits.
        return Err(ErrMode::from_input(input).cut());
    }
    let bytes = scaled / divisor * if negative { -1 } else { 1 };
    i64::try_from(bytes).map_err(|_| ErrMode::from_input(input).cut())
}
