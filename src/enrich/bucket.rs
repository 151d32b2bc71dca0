//! Trade-size bucketing.
//!
//! Feed amounts are free-form text. Anything that parses as a number (NaN aside)
//! lands in exactly one of the eleven half-open, lower-inclusive ranges below;
//! everything else is `Unknown`.

use crate::domain::SizeBucket;

/// Exclusive upper bound of every bucket below `Over50M`, in dollars.
const UPPER_BOUNDS: [(f64, SizeBucket); 10] = [
    (1_000.0, SizeBucket::Under1K),
    (15_000.0, SizeBucket::From1KTo15K),
    (50_000.0, SizeBucket::From15KTo50K),
    (100_000.0, SizeBucket::From50KTo100K),
    (250_000.0, SizeBucket::From100KTo250K),
    (500_000.0, SizeBucket::From250KTo500K),
    (1_000_000.0, SizeBucket::From500KTo1M),
    (5_000_000.0, SizeBucket::From1MTo5M),
    (25_000_000.0, SizeBucket::From5MTo25M),
    (50_000_000.0, SizeBucket::From25MTo50M),
];

/// Bucket a raw amount field.
pub fn bucket_trade_size(amount: Option<&str>) -> SizeBucket {
    amount
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .map(bucket_amount)
        .unwrap_or(SizeBucket::Unknown)
}

/// Bucket a numeric amount. NaN is `Unknown`.
pub fn bucket_amount(amount: f64) -> SizeBucket {
    if amount.is_nan() {
        return SizeBucket::Unknown;
    }
    UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| amount < *upper)
        .map(|(_, bucket)| *bucket)
        .unwrap_or(SizeBucket::Over50M)
}
