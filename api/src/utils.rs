use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;

use crate::consts::{APY_SCALE, DENOMINATOR_BPS, TOKEN_DECIMALS, UNSTAKE_FEE_BPS};
use crate::error::StakingError;

/// Formats an 18-decimal token amount the way ethers' `formatEther` does:
/// trailing zeros trimmed, at least one fractional digit.
pub fn format_token(amount: U256) -> String {
    let formatted = format_ether(amount);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Parses a user-entered decimal string into an 18-decimal token amount.
///
/// Rejects empty input, signs, exponents, separators and more than 18
/// significant fractional digits. `".5"` and `"5."` are accepted, and
/// trailing zeros past the 18th place are ignored.
pub fn parse_token(input: &str) -> Result<U256, StakingError> {
    let invalid = || StakingError::InvalidAmount(input.to_string());
    let trimmed = input.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return Err(invalid());
    }
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > TOKEN_DECIMALS as usize {
        return Err(invalid());
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };
    parse_ether(&normalized).map_err(|_| invalid())
}

/// Renders `currentAPY()` as a percentage with two decimals. 12345 → "123.45".
pub fn format_apy(raw: U256) -> String {
    let scale = U256::from(APY_SCALE);
    let whole = raw / scale;
    let hundredths = (raw % scale).to::<u64>();
    format!("{whole}.{hundredths:02}")
}

/// Inserts thousands separators into the integer part of a decimal string.
pub fn group_thousands(value: &str) -> String {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let mut grouped = String::with_capacity(value.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

/// Fee the contract is expected to withhold when unstaking `amount`.
pub fn unstake_fee(amount: U256) -> U256 {
    let fee = U256::from(UNSTAKE_FEE_BPS);
    let denominator = U256::from(DENOMINATOR_BPS);
    match amount.checked_mul(fee) {
        Some(scaled) => scaled / denominator,
        None => amount / denominator * fee,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test_case(0, "0.0"; "zero")]
    #[test_case(ONE, "1.0"; "one token")]
    #[test_case(ONE + ONE / 2, "1.5"; "one and a half")]
    #[test_case(1, "0.000000000000000001"; "one wei")]
    #[test_case(1_234_567 * ONE, "1234567.0"; "large whole amount")]
    fn test_format_token(raw: u128, expected: &str) {
        assert_eq!(format_token(U256::from(raw)), expected);
    }

    #[test_case(30000, "300.00"; "whole percent")]
    #[test_case(12345, "123.45"; "fractional percent")]
    #[test_case(5, "0.05"; "below one percent")]
    #[test_case(0, "0.00"; "zero")]
    fn test_format_apy(raw: u64, expected: &str) {
        assert_eq!(format_apy(U256::from(raw)), expected);
    }

    #[test_case("1", ONE; "integer")]
    #[test_case("1.5", ONE + ONE / 2; "decimal")]
    #[test_case(".5", ONE / 2; "leading dot")]
    #[test_case("2.", 2 * ONE; "trailing dot")]
    #[test_case(" 3 ", 3 * ONE; "surrounding whitespace")]
    #[test_case("0.000000000000000001", 1; "smallest unit")]
    #[test_case("0", 0; "zero")]
    #[test_case("0.0", 0; "zero with fraction")]
    #[test_case("1.0000000000000000000", ONE; "zero padding past precision")]
    #[test_case("0.0000000000000000010", 1; "smallest unit padded")]
    fn test_parse_token(input: &str, expected: u128) {
        assert_eq!(parse_token(input), Ok(U256::from(expected)));
    }

    #[test_case(""; "empty")]
    #[test_case("."; "lone dot")]
    #[test_case("-1"; "negative")]
    #[test_case("1e18"; "exponent")]
    #[test_case("1,000"; "separator")]
    #[test_case("abc"; "letters")]
    #[test_case("1.2.3"; "two dots")]
    #[test_case("0.0000000000000000001"; "too precise")]
    fn test_parse_token_rejects(input: &str) {
        assert_eq!(
            parse_token(input),
            Err(StakingError::InvalidAmount(input.to_string()))
        );
    }

    #[test_case("0.0", "0.0"; "small")]
    #[test_case("999.5", "999.5"; "no separator needed")]
    #[test_case("1000", "1,000"; "no fraction")]
    #[test_case("1234567.25", "1,234,567.25"; "millions")]
    fn test_group_thousands(input: &str, expected: &str) {
        assert_eq!(group_thousands(input), expected);
    }

    #[test]
    fn test_unstake_fee_is_two_percent() {
        assert_eq!(unstake_fee(U256::from(100 * ONE)), U256::from(2 * ONE));
        assert_eq!(unstake_fee(U256::from(49)), U256::ZERO);
        assert!(unstake_fee(U256::MAX) < U256::MAX);
    }
}
