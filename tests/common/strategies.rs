//! Proptest strategies for key fields.

use proptest::prelude::*;

/// Valid key names: `[A-Za-z0-9-_.]+`, never containing `:`
pub fn key_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9._-]{0,40}"
}

/// One version segment, weighted towards small values but reaching the
/// digit-count boundaries up to `u64::MAX`
pub fn version_segment_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        3 => 0u64..2000,
        1 => 9_999_999_990u64..10_000_000_010,
        1 => any::<u64>(),
    ]
}

pub fn version_segments_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
    (
        version_segment_strategy(),
        version_segment_strategy(),
        version_segment_strategy(),
    )
}

pub fn version_strategy() -> impl Strategy<Value = String> {
    version_segments_strategy().prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
}
