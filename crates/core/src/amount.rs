// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cash amount parsing and formatting.
//!
//! Operators write amounts as plain integers or scientific notation
//! (`"1e10"`, `"2.5e6"`), matching what the economy bot accepts.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount: '{0}'")]
pub struct ParseAmountError(pub String);

/// Parse an operator-supplied amount string.
pub fn parse_amount(s: &str) -> Result<u64, ParseAmountError> {
    let input = s.trim();
    let err = || ParseAmountError(input.to_string());
    if input.is_empty() {
        return Err(err());
    }

    if input.contains(['e', 'E', '.']) {
        let value: f64 = input.parse().map_err(|_| err())?;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(err());
        }
        // Beyond 2^53 an f64 no longer represents integers exactly
        if value > 9_007_199_254_740_992.0 {
            return Err(err());
        }
        return Ok(value as u64);
    }

    input.parse().map_err(|_| err())
}

/// Format an amount with thousands separators for display.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
