use alloy::primitives::U256;
use fastnum::{
    UD256, bint,
    decimal::{Context, RoundingMode, UnsignedDecimal},
};

use crate::error::FundKitError;

/// Converter between human readable token amounts and on-chain base units
/// of a token with the given number of decimals.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: u8,
}

impl Converter {
    pub fn new(decimals: u8) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Converts a decimal amount string (e.g. `"0.01"`) into base units,
    /// rounding down any precision beyond the token decimals. Amounts that
    /// do not fit into `U256` once scaled are rejected.
    pub fn to_base_units(&self, amount: &str) -> Result<U256, FundKitError> {
        let amount = amount.trim();
        let invalid = || FundKitError::InvalidAmount(amount.to_string());
        let (int, frac) = amount.split_once('.').unwrap_or((amount, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int.is_empty() && frac.is_empty()) || !is_digits(int) || !is_digits(frac) {
            return Err(invalid());
        }
        let frac = &frac[..frac.len().min(self.decimals as usize)];
        let padding = self.decimals as usize - frac.len();
        let digits = format!("{int}{frac}{}", "0".repeat(padding));
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        // Fails instead of wrapping once the scaled amount exceeds 256 bits.
        U256::from_str_radix(digits, 10).map_err(|_| invalid())
    }

    /// Converts base units back into a decimal amount.
    pub fn from_base_units(&self, value: U256) -> UD256 {
        let unscaled = bint::UInt::<4>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<4>");
        UnsignedDecimal::<4>::from_parts(
            unscaled,
            -(self.decimals as i32),
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }
}
