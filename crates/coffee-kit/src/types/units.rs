//! Decimal amount parsing and formatting.
//!
//! On-chain amounts are integers in the token's smallest unit. Users type
//! decimal strings like `"1.5"`; these helpers convert between the two without
//! floating point, so `"10"` at 18 decimals is exactly `10 × 10^18`.

use std::fmt;

use alloy_primitives::U256;

use crate::error::ParseAmountError;

/// Decimals of the native coin (VET).
pub const VET_DECIMALS: u8 = 18;

/// Symbol of the native coin.
pub const VET_SYMBOL: &str = "VET";

/// Largest supported decimals; `10^77` is the largest power of ten below `2^256`.
pub const MAX_DECIMALS: u8 = 77;

fn ten_pow(decimals: u8) -> Result<U256, ParseAmountError> {
    if decimals > MAX_DECIMALS {
        return Err(ParseAmountError::UnsupportedDecimals(decimals));
    }
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

fn parse_digits(digits: &str, input: &str) -> Result<U256, ParseAmountError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidNumber(input.to_string()));
    }
    // Only overflow can fail once the digits are validated.
    U256::from_str_radix(digits, 10).map_err(|_| ParseAmountError::Overflow)
}

/// Parse a decimal string into a raw amount with the given number of decimals.
///
/// Accepts an optional fractional part (`"1.5"`, `".5"`, `"5."`). Rejects
/// signs, exponents, separators, and more fractional digits than `decimals`
/// (there is no rounding).
///
/// # Example
///
/// ```
/// use coffee_kit::parse_units;
/// use alloy_primitives::U256;
///
/// assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
/// assert!(parse_units("1.5", 0).is_err());
/// ```
pub fn parse_units(s: &str, decimals: u8) -> Result<U256, ParseAmountError> {
    let input = s.trim();

    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let scale = ten_pow(decimals)?;

    let (whole_str, frac_str) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(ParseAmountError::InvalidNumber(input.to_string()));
    }

    let whole = if whole_str.is_empty() {
        U256::ZERO
    } else {
        parse_digits(whole_str, input)?
    };

    if frac_str.len() > decimals as usize {
        if frac_str.contains('.') {
            return Err(ParseAmountError::InvalidNumber(input.to_string()));
        }
        return Err(ParseAmountError::TooManyDecimals {
            input: input.to_string(),
            max: decimals,
        });
    }

    let frac = if frac_str.is_empty() {
        U256::ZERO
    } else {
        // Pad fractional part with zeros
        let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
        parse_digits(&padded, input)?
    };

    whole
        .checked_mul(scale)
        .and_then(|shifted| shifted.checked_add(frac))
        .ok_or(ParseAmountError::Overflow)
}

/// Format a raw amount with the given number of decimals.
///
/// Trailing fractional zeros are trimmed and a zero fraction is omitted.
///
/// ```
/// use coffee_kit::format_units;
/// use alloy_primitives::U256;
///
/// assert_eq!(format_units(U256::from(1_000_000_000_000_000_000u128), 18), "1");
/// assert_eq!(format_units(U256::from(500_000u64), 6), "0.5");
/// ```
pub fn format_units(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    let (whole, frac) = match ten_pow(decimals) {
        Ok(divisor) => (raw / divisor, raw % divisor),
        // 10^decimals is above U256::MAX, so every raw value is a fraction
        Err(_) => (U256::ZERO, raw),
    };

    if frac.is_zero() {
        whole.to_string()
    } else {
        // Format with leading zeros, then trim trailing zeros
        let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
        let trimmed = frac_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// A token amount with baked-in decimals and symbol for display.
///
/// ```
/// use coffee_kit::TokenAmount;
/// use alloy_primitives::U256;
///
/// let amount = TokenAmount::new(U256::from(1_500_000u64), 6, "USDC");
/// assert_eq!(amount.to_string(), "1.5 USDC");
/// assert_eq!(amount.format_amount(), "1.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
    symbol: String,
}

impl TokenAmount {
    /// Create a new amount from a raw value with explicit decimals and symbol.
    pub fn new(raw: U256, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            raw,
            decimals,
            symbol: symbol.into(),
        }
    }

    /// Create a native coin amount from its raw value (wei).
    pub fn vet(raw: U256) -> Self {
        Self::new(raw, VET_DECIMALS, VET_SYMBOL)
    }

    /// Parse a human-readable decimal string like "1.5" into an amount.
    pub fn parse(
        s: &str,
        decimals: u8,
        symbol: impl Into<String>,
    ) -> Result<Self, ParseAmountError> {
        let raw = parse_units(s, decimals)?;
        Ok(Self::new(raw, decimals, symbol))
    }

    /// Get the raw amount (in smallest units).
    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// Get the number of decimal places.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Get the token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Check if this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Format as a string without the symbol.
    pub fn format_amount(&self) -> String {
        format_units(self.raw, self.decimals)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.format_amount(), self.symbol)
    }
}

impl From<TokenAmount> for U256 {
    fn from(amount: TokenAmount) -> U256 {
        amount.raw
    }
}
