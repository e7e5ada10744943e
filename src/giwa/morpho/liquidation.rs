use rust_decimal::{Decimal, dec};

/// Kimchi premium above which the custom liquidation pathway opens (3%).
pub const CUSTOM_LIQUIDATION_THRESHOLD: Decimal = dec!(0.03);

/// Returns true when `kimchi_premium` (0.03 = 3%) reaches the custom
/// liquidation threshold.
///
/// Advisory only: it saves a transaction that would obviously revert. The
/// contract enforces the real condition when `customLiquidate` is called.
#[must_use]
pub fn is_custom_liquidation_active(kimchi_premium: Decimal) -> bool {
    kimchi_premium >= CUSTOM_LIQUIDATION_THRESHOLD
}
