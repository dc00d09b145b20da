use thiserror::Error;

/// The number of MIST in one SUI.
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// The number of decimal places of SUI.
pub const SUI_DECIMALS: usize = 9;

/// An error returned when converting a user-entered SUI amount into MIST.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a valid decimal number: {0}")]
    Invalid(String),
    #[error("amount has more than 9 decimal places: {0}")]
    TooPrecise(String),
    #[error("amount does not fit in u64 MIST: {0}")]
    Overflow(String),
}

/// Parses a decimal SUI amount (e.g. `"1.5"`) into MIST.
///
/// The conversion is exact: at most nine fractional digits are accepted and no floating point is
/// involved. Signs, exponents and non-digit characters are rejected.
pub fn parse_sui(input: &str) -> Result<u64, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Invalid(input.to_string()));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(input.to_string()));
    }
    if fraction.len() > SUI_DECIMALS {
        return Err(AmountError::TooPrecise(input.to_string()));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| AmountError::Overflow(input.to_string()))?
    };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<width$}", width = SUI_DECIMALS)
            .parse()
            .map_err(|_| AmountError::Invalid(input.to_string()))?
    };

    whole
        .checked_mul(MIST_PER_SUI)
        .and_then(|mist| mist.checked_add(fraction))
        .ok_or_else(|| AmountError::Overflow(input.to_string()))
}

/// Converts a whole number of SUI into MIST.
pub fn sui_to_mist(sui: u64) -> Result<u64, AmountError> {
    sui.checked_mul(MIST_PER_SUI).ok_or_else(|| AmountError::Overflow(sui.to_string()))
}

/// Formats a MIST amount as SUI with a fixed number of decimals, rounding half away from zero.
///
/// At most nine decimals are shown, the precision of MIST.
#[must_use]
pub fn format_sui(mist: u64, decimals: usize) -> String {
    let decimals = decimals.min(SUI_DECIMALS);
    let unit = 10_u128.pow((SUI_DECIMALS - decimals) as u32);
    let scaled = (u128::from(mist) + unit / 2) / unit;
    if decimals == 0 {
        return scaled.to_string();
    }
    let scale = 10_u128.pow(decimals as u32);
    format!("{}.{:0width$}", scaled / scale, scaled % scale, width = decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sui_whole_and_fractional() {
        assert_eq!(parse_sui("1").unwrap(), 1_000_000_000);
        assert_eq!(parse_sui("1.5").unwrap(), 1_500_000_000);
        assert_eq!(parse_sui("0.000000001").unwrap(), 1);
        assert_eq!(parse_sui(".25").unwrap(), 250_000_000);
        assert_eq!(parse_sui("100.").unwrap(), 100_000_000_000);
        assert_eq!(parse_sui(" 2 ").unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_parse_sui_rejects_bad_input() {
        assert_eq!(parse_sui(""), Err(AmountError::Empty));
        assert!(matches!(parse_sui("."), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sui("-1"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sui("1e9"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sui("1.2.3"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_sui("0.0000000001"), Err(AmountError::TooPrecise(_))));
        assert!(matches!(parse_sui("18446744074"), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_sui_to_mist() {
        assert_eq!(sui_to_mist(100).unwrap(), 100_000_000_000);
        assert!(sui_to_mist(u64::MAX).is_err());
    }

    #[test]
    fn test_format_sui() {
        assert_eq!(format_sui(1_234_500_000, 4), "1.2345");
        assert_eq!(format_sui(0, 2), "0.00");
        assert_eq!(format_sui(2_500_000_000, 2), "2.50");
    }

    #[test]
    fn test_format_sui_rounds_ties_up() {
        assert_eq!(format_sui(31_250_000, 4), "0.0313");
        assert_eq!(format_sui(31_249_999, 4), "0.0312");
        assert_eq!(format_sui(1_999_999_999, 2), "2.00");
        assert_eq!(format_sui(1_500_000_000, 0), "2");
        assert_eq!(format_sui(u64::MAX, 12), "18446744073.709551615");
    }
}
