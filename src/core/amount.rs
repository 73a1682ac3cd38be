//! Decimal amount scaling shared by every chain.
//!
//! Callers pass human amounts ("1.5") plus the asset's decimals; chains only ever see
//! integer base units.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{Result, SignerError};

/// 10^38 is the largest power of ten that fits in `u128`.
pub const MAX_DECIMALS: u32 = 38;

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:\.(\d*))?$").expect("Hardcoded regex should always compile"));

/// `amount * 10^decimals` as an integer number of base units.
///
/// Exact digit arithmetic in `u128`; rejects negative, malformed and
/// fractional-after-scaling values.
pub fn scale_amount(amount: &str, decimals: u32) -> Result<u128> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(SignerError::invalid_input("amount is empty"));
    }
    if decimals > MAX_DECIMALS {
        return Err(SignerError::invalid_input(format!(
            "decimals must be at most {}, got {}",
            MAX_DECIMALS, decimals
        )));
    }
    if trimmed.starts_with('-') {
        return Err(SignerError::invalid_input(format!("amount must not be negative: {}", trimmed)));
    }
    let caps = AMOUNT_RE
        .captures(trimmed)
        .ok_or_else(|| SignerError::invalid_input(format!("invalid amount `{}`", trimmed)))?;
    let whole = caps.get(1).map_or("", |m| m.as_str());
    // trailing zeros carry no value: "0.100000000" at 6 decimals is fine
    let fraction = caps.get(2).map_or("", |m| m.as_str()).trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(SignerError::invalid_input(format!(
            "amount {} has more than {} decimal places",
            trimmed, decimals
        )));
    }

    let overflow = || SignerError::invalid_input(format!("amount overflows: {}", trimmed));
    let padding = decimals as usize - fraction.len();
    whole
        .bytes()
        .chain(fraction.bytes())
        .chain(std::iter::repeat(b'0').take(padding))
        .try_fold(0u128, |acc, digit| {
            acc.checked_mul(10)
                .and_then(|v| v.checked_add(u128::from(digit - b'0')))
                .ok_or_else(|| overflow())
        })
}

/// Scaled amount narrowed to `u64` (satoshis, lamports, nanotons).
pub fn scale_amount_u64(amount: &str, decimals: u32) -> Result<u64> {
    let v = scale_amount(amount, decimals)?;
    u64::try_from(v).map_err(|_| SignerError::invalid_input(format!("amount exceeds u64: {}", amount)))
}
