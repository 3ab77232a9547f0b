//! Claim calculator constants

/// Fractional digits kept when dividing by an exchange ratio.
pub const DIVISION_SCALE: i64 = 48;

/// Fractional digits kept on amounts derived by multiplying with a ratio.
///
/// Must stay well below `DIVISION_SCALE` so that dividing by a ratio and
/// multiplying back recovers the original amount.
pub const AMOUNT_SCALE: i64 = 24;

/// Slider range is expressed in percent of the swap limit
pub const SLIDER_MAX: u32 = 100;

/// Verb used in the claim transaction summary
pub const SUMMARY_VERB: &str = "Swap";

/// Largest power of ten an accepted amount may carry (`1e96`).
///
/// Bounds every intermediate `10^n` the calculator computes.
pub const MAX_AMOUNT_EXPONENT: i64 = 96;

/// Most fractional digits an accepted amount may carry
pub const MAX_AMOUNT_SCALE: i64 = 64;

/// Most significant bits in an accepted amount's digits
pub const MAX_AMOUNT_BITS: u64 = 2048;
