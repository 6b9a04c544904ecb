//! Wallet top-up limits and quick amounts (VND)

use crate::error::{CoreError, CoreResult};

/// Preset quick top-up amounts shown by clients.
pub const QUICK_TOP_UP_AMOUNTS: [i64; 6] =
    [50_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000];

/// Minimum accepted top-up.
pub const MIN_TOP_UP_AMOUNT: i64 = 10_000;

/// Maximum accepted top-up.
pub const MAX_TOP_UP_AMOUNT: i64 = 50_000_000;

/// Validate a top-up amount against the gateway limits.
pub fn validate_top_up_amount(amount: i64) -> CoreResult<()> {
    if amount < MIN_TOP_UP_AMOUNT {
        return Err(CoreError::validation(format!(
            "top-up amount must be at least {MIN_TOP_UP_AMOUNT} VND"
        )));
    }
    if amount > MAX_TOP_UP_AMOUNT {
        return Err(CoreError::validation(format!(
            "top-up amount must be at most {MAX_TOP_UP_AMOUNT} VND"
        )));
    }
    Ok(())
}
