use super::address::Address;
use crate::error::{PayrollError, Result};
use serde::{Deserialize, Serialize};

/// One token holding as reported by the wallet service.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TokenBalanceRecord {
    pub symbol: String,
    pub contract_address: Address,
    /// Unsigned integer in the token's smallest unit, as decimal text.
    pub raw_amount: String,
    pub decimals: u32,
}

impl TokenBalanceRecord {
    /// Renders the raw amount divided by `10^decimals` with exactly `decimals`
    /// fractional digits.
    pub fn to_display(&self) -> Result<String> {
        format_units(&self.raw_amount, self.decimals)
    }
}

/// Most decimal digits a 256-bit token amount can have.
pub const MAX_DECIMALS: u32 = 77;

/// Shifts the decimal point of an unsigned integer string `decimals` places
/// to the left.
///
/// Works on the digits directly so no precision is lost however large the
/// raw amount is.
pub fn format_units(raw: &str, decimals: u32) -> Result<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PayrollError::BalanceQuery(format!(
            "raw amount {raw:?} is not an unsigned integer"
        )));
    }
    if decimals > MAX_DECIMALS {
        return Err(PayrollError::BalanceQuery(format!(
            "{decimals} decimals exceeds the maximum of {MAX_DECIMALS}"
        )));
    }
    let digits = raw.trim_start_matches('0');
    let decimals = decimals as usize;
    if decimals == 0 {
        return Ok(if digits.is_empty() { "0" } else { digits }.to_string());
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    Ok(format!("{whole}.{fraction}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usdc_amount() {
        assert_eq!(format_units("6715000", 6).unwrap(), "6.715000");
    }

    #[test]
    fn test_format_keeps_trailing_zeros() {
        assert_eq!(format_units("1000000", 6).unwrap(), "1.000000");
        assert_eq!(format_units("0", 6).unwrap(), "0.000000");
        assert_eq!(format_units("5", 6).unwrap(), "0.000005");
        assert_eq!(format_units("000120", 2).unwrap(), "1.20");
    }

    #[test]
    fn test_format_zero_decimals() {
        assert_eq!(format_units("42", 0).unwrap(), "42");
        assert_eq!(format_units("000", 0).unwrap(), "0");
    }

    #[test]
    fn test_format_beyond_float_precision() {
        let raw = "123456789012345678901234567890123456789012";
        assert_eq!(
            format_units(raw, 18).unwrap(),
            "123456789012345678901234.567890123456789012"
        );
    }

    #[test]
    fn test_format_rejects_oversized_decimals() {
        assert_eq!(format_units("1", 77).unwrap().len(), 79);
        assert!(matches!(
            format_units("1", u32::MAX),
            Err(PayrollError::BalanceQuery(_))
        ));
    }

    #[test]
    fn test_format_rejects_non_digits() {
        assert!(matches!(
            format_units("-5", 6),
            Err(PayrollError::BalanceQuery(_))
        ));
        assert!(format_units("", 6).is_err());
        assert!(format_units("1.5", 6).is_err());
    }
}
