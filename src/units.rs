//! Fixed-point unit conversions.
//!
//! On-chain amounts are integers in base units: 18 decimals for both market
//! tokens, and 36 decimals for the oracle price. These helpers turn them into
//! [`Decimal`]s for display and parse human amounts back into base units.

use alloy::primitives::{U256, uint};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Decimals of both market tokens.
pub const DEFAULT_DECIMALS: u32 = 18;
/// Fractional digits shown for token amounts.
pub const DEFAULT_PRECISION: u32 = 2;

/// 1e18
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Oracle price scale (1e36)
pub const ORACLE_PRICE_SCALE: U256 = uint!(1_000000000000000000_000000000000000000_U256);

/// Largest mantissa a [`Decimal`] can hold (2^96 - 1).
const MAX_MANTISSA: U256 = U256::from_limbs([u64::MAX, u32::MAX as u64, 0, 0]);
/// Largest scale a [`Decimal`] can hold.
const MAX_SCALE: u32 = 28;

/// Converts `raw` base units into a decimal by dividing by `10^decimals`.
///
/// A [`Decimal`] carries at most 28 significant digits. Values with more
/// digits lose their least significant ones (truncated toward zero), which
/// keeps amounts up to ~10^12 whole tokens precise far beyond `f64`.
///
/// Returns [`Error::Overflow`] when the integer part alone doesn't fit.
pub fn scale_to_decimal(raw: U256, decimals: u32) -> Result<Decimal> {
    let ten = U256::from(10);
    let mut mantissa = raw;
    let mut scale = decimals;
    while scale > 0 && (scale > MAX_SCALE || mantissa > MAX_MANTISSA) {
        mantissa /= ten;
        scale -= 1;
    }

    if mantissa > MAX_MANTISSA {
        return Err(Error::Overflow(format!(
            "{raw} with {decimals} decimals exceeds decimal range"
        )));
    }

    Ok(Decimal::from_i128_with_scale(mantissa.to::<i128>(), scale))
}

/// Converts a human amount into base units.
///
/// Fractional digits beyond `decimals` are rounded. Negative amounts and
/// amounts that can't be represented with `decimals` fractional digits are
/// rejected.
pub fn to_wei(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(format!("{amount} is negative")));
    }

    let mut scaled = amount;
    scaled.rescale(decimals);
    if scaled.scale() != decimals {
        return Err(Error::InvalidAmount(format!(
            "{amount} can't be represented with {decimals} decimals"
        )));
    }

    let mantissa = u128::try_from(scaled.mantissa())
        .map_err(|_| Error::InvalidAmount(format!("{amount} is negative")))?;
    Ok(U256::from(mantissa))
}

/// Rounds `value` half away from zero and renders exactly `precision`
/// fractional digits.
pub fn format_fixed(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

/// Renders a fraction (0.0145) as a percentage string ("1.45").
pub fn format_percent(value: Decimal, precision: u32) -> String {
    format_fixed(value.saturating_mul(Decimal::ONE_HUNDRED), precision)
}

/// Formats base units as a fixed precision string.
///
/// ```
/// use giwasdk::{U256, units::format_amount};
///
/// let raw = U256::from(1_500_000_000_000_000_000u128);
/// assert_eq!(format_amount(raw, 18, 2).unwrap(), "1.50");
/// ```
pub fn format_amount(raw: U256, decimals: u32, precision: u32) -> Result<String> {
    Ok(format_fixed(scale_to_decimal(raw, decimals)?, precision))
}

/// [`format_amount`] with 18 decimals and 2 digits of precision.
#[inline(always)]
pub fn format_amount_default(raw: U256) -> Result<String> {
    format_amount(raw, DEFAULT_DECIMALS, DEFAULT_PRECISION)
}

/// Inverts the oracle price.
///
/// The oracle quotes collateral units per loan unit scaled by 1e36. The
/// inverse, loan units per collateral unit, is computed with integer division
/// (`1e36 / price`) and read back with 18 decimals.
///
/// A zero price is rejected with [`Error::DivisionByZero`].
pub fn invert_price_feed(raw_price: U256) -> Result<Decimal> {
    if raw_price.is_zero() {
        return Err(Error::DivisionByZero("oracle price"));
    }
    scale_to_decimal(ORACLE_PRICE_SCALE / raw_price, DEFAULT_DECIMALS)
}

/// Borrowed over supplied assets. Zero when nothing is supplied.
pub fn utilization(total_borrow_assets: u128, total_supply_assets: u128) -> Result<Decimal> {
    if total_supply_assets == 0 {
        return Ok(Decimal::ZERO);
    }

    let borrow = scale_to_decimal(U256::from(total_borrow_assets), DEFAULT_DECIMALS)?;
    let supply = scale_to_decimal(U256::from(total_supply_assets), DEFAULT_DECIMALS)?;
    borrow
        .checked_div(supply)
        .ok_or_else(|| Error::Overflow(format!("{borrow} / {supply}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_scale_to_decimal() {
        let test_values = [
            (
                U256::from(72305406316320073300i128),
                18,
                dec!(72.305406316320073300),
            ),
            (U256::from(98996405), 6, dec!(98.996405)),
            (U256::ZERO, 18, Decimal::ZERO),
            (ORACLE_PRICE_SCALE, 36, Decimal::ONE),
        ];
        for (index, (got, decimals, expect)) in test_values.into_iter().enumerate() {
            assert_eq!(scale_to_decimal(got, decimals).unwrap(), expect, "failed at {index}");
        }
    }

    #[test]
    fn test_scale_to_decimal_large_amounts() {
        // 10^12 whole tokens plus 18 fractional digits: 31 significant digits
        let raw = U256::from(1_000_000_000_000_123_456_789_012_345_678u128);
        let value = scale_to_decimal(raw, 18).unwrap();
        assert_eq!(value, dec!(1000000000000.1234567890123456));

        let err = scale_to_decimal(U256::MAX, 18).unwrap_err();
        assert!(err.is_overflow());
    }

    #[test]
    fn test_to_wei() {
        let test_values = [
            (
                dec!(72.305406316320073386),
                18,
                U256::from(72305406316320073386i128),
            ),
            (dec!(98.996405), 6, U256::from(98996405)),
            (dec!(69), 6, U256::from(69000000)),
            (dec!(10000000), 18, U256::from(10_000_000u128) * WAD),
        ];
        for (index, (got, decimals, expect)) in test_values.into_iter().enumerate() {
            assert_eq!(to_wei(got, decimals).unwrap(), expect, "failed at {index}");
        }
    }

    #[test]
    fn test_to_wei_rejects_negative() {
        assert!(to_wei(dec!(-1.5), 18).unwrap_err().is_invalid_amount());
        assert_eq!(to_wei(Decimal::ZERO, 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_format_amount() {
        let one_and_a_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_amount(one_and_a_half, 18, 2).unwrap(), "1.50");
        assert_eq!(format_amount(U256::ZERO, 18, 2).unwrap(), "0.00");
        assert_eq!(
            format_amount_default(U256::from(123_456_000_000_000_000_000u128)).unwrap(),
            "123.46"
        );
        assert_eq!(format_amount(U256::from(98996405), 6, 4).unwrap(), "98.9964");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.0145), 2), "1.45");
        assert_eq!(format_percent(dec!(0.5), 2), "50.00");
        assert_eq!(format_percent(Decimal::ZERO, 4), "0.0000");
    }

    #[test]
    fn test_invert_price_feed() {
        let test_values = [
            (U256::from(219_010_074_463u64), dec!(4566000.000008867172000017)),
            (WAD, Decimal::ONE),
            (U256::from(300_000_000_000_000_000u64), dec!(3.333333333333333333)),
            (U256::from(1), dec!(1000000000000000000)),
            (ORACLE_PRICE_SCALE * U256::from(10), Decimal::ZERO),
        ];
        for (index, (price, expect)) in test_values.into_iter().enumerate() {
            let got = invert_price_feed(price).unwrap();
            assert_eq!(got, expect, "failed at {index}");
            // integer division first, then 18 decimals
            let reference = scale_to_decimal(ORACLE_PRICE_SCALE / price, 18).unwrap();
            assert_eq!(got, reference, "failed at {index}");
        }

        assert_eq!(
            format_fixed(invert_price_feed(U256::from(219_010_074_463u64)).unwrap(), 0),
            "4566000"
        );
    }

    #[test]
    fn test_invert_price_feed_round_trip() {
        let prices = [
            U256::from(219_010_074_463u64),
            WAD,
            U256::from(300_000_000_000_000_000u64),
            U256::from(7_000_000_000_000u64),
        ];
        for (index, price) in prices.into_iter().enumerate() {
            let inverted = invert_price_feed(price).unwrap();
            let back = ORACLE_PRICE_SCALE / to_wei(inverted, 18).unwrap();
            let diff = if back > price { back - price } else { price - back };
            // integer division drops at most one unit per step
            assert!(diff <= U256::from(1), "failed at {index}: {back} vs {price}");
        }

        assert_eq!(
            ORACLE_PRICE_SCALE / to_wei(invert_price_feed(WAD).unwrap(), 18).unwrap(),
            WAD
        );
    }

    #[test]
    fn test_oracle_price_scale() {
        assert_eq!(ORACLE_PRICE_SCALE, U256::from(10).pow(U256::from(36)));
        assert_eq!(ORACLE_PRICE_SCALE, WAD * WAD);
    }

    #[test]
    fn test_invert_zero_price_fails() {
        let err = invert_price_feed(U256::ZERO).unwrap_err();
        assert!(err.is_division_by_zero());
    }

    #[test]
    fn test_utilization() {
        let test_values = [
            (500, 1000, dec!(0.5)),
            (0, 1000, Decimal::ZERO),
            (1, 4, dec!(0.25)),
            (3_000_000_000_000_000_000, 4_000_000_000_000_000_000, dec!(0.75)),
            (1000, 1000, Decimal::ONE),
        ];
        for (index, (borrow, supply, expect)) in test_values.into_iter().enumerate() {
            assert_eq!(utilization(borrow, supply).unwrap(), expect, "failed at {index}");
        }
    }

    #[test]
    fn test_utilization_without_supply() {
        assert_eq!(utilization(0, 0).unwrap(), Decimal::ZERO);
        assert_eq!(utilization(12345, 0).unwrap(), Decimal::ZERO);
    }
}
