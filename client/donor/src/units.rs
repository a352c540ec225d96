//! Display-unit ↔ stroop conversion for the 7-decimal funding asset.

use thiserror::Error;

/// Stroops per display unit of the funding asset.
pub const STROOPS_PER_UNIT: i128 = 10_000_000;

/// Fractional digits of the funding asset.
pub const DECIMALS: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("not a decimal number")]
    Malformed,
    #[error("amount must be positive")]
    NotPositive,
    #[error("more than {DECIMALS} decimal places")]
    TooPrecise,
    #[error("amount out of range")]
    Overflow,
}

/// Parse a display-unit decimal string (`"0.05"`) into stroops.
///
/// Rejects anything that is not a plain positive decimal: signs, exponents,
/// empty input, more than [`DECIMALS`] fractional digits, zero.
pub fn parse_amount(display: &str) -> Result<i128, AmountError> {
    let trimmed = display.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Malformed);
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(AmountError::NotPositive);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Malformed);
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::Malformed);
    }
    if frac_part.len() > DECIMALS {
        return Err(AmountError::TooPrecise);
    }

    let whole: i128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| AmountError::Overflow)?
    };

    let mut frac: i128 = 0;
    if !frac_part.is_empty() {
        frac = frac_part.parse().map_err(|_| AmountError::Overflow)?;
        frac *= 10_i128.pow((DECIMALS - frac_part.len()) as u32);
    }

    let stroops = whole
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|w| w.checked_add(frac))
        .ok_or(AmountError::Overflow)?;

    if stroops <= 0 {
        return Err(AmountError::NotPositive);
    }
    Ok(stroops)
}

/// Format stroops as a display-unit decimal string with trailing zeros
/// trimmed: `500000` → `"0.05"`, `10000000` → `"1"`.
pub fn format_amount(stroops: i128) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let magnitude = stroops.unsigned_abs();
    let whole = magnitude / STROOPS_PER_UNIT as u128;
    let frac = magnitude % STROOPS_PER_UNIT as u128;

    if frac == 0 {
        return format!("{sign}{whole}");
    }
    let frac_str = format!("{frac:07}");
    format!("{sign}{whole}.{}", frac_str.trim_end_matches('0'))
}
