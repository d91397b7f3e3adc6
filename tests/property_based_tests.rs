mod common;

use chrono::{TimeZone, Utc};
use common::strategies::*;
use policy_models::keys::{sortable_version, PfConceptKey, PfKey, PfTimestampKey};
use proptest::prelude::*;

proptest! {
    /// Property: a valid key's id parses back to the same key
    #[test]
    fn concept_key_ids_parse_back(name in key_name_strategy(), version in version_strategy()) {
        let key = PfConceptKey::new(name, version);
        prop_assert!(key.validate().is_ok());
        let parsed = PfConceptKey::from_id(&key.id()).unwrap();
        prop_assert_eq!(parsed, key);
    }

    /// Property: sortable versions order the same way as their numeric segments
    #[test]
    fn sortable_versions_order_numerically(a in version_segments_strategy(), b in version_segments_strategy()) {
        let render = |(x, y, z): (u64, u64, u64)| format!("{x}.{y}.{z}");
        prop_assert_eq!(sortable_version(&render(a)).cmp(&sortable_version(&render(b))), a.cmp(&b));
    }

    /// Property: newer-than agrees with version order for keys of one name
    #[test]
    fn newer_than_follows_version_order(
        name in key_name_strategy(),
        a in version_segments_strategy(),
        b in version_segments_strategy(),
    ) {
        let render = |(x, y, z): (u64, u64, u64)| format!("{x}.{y}.{z}");
        let first = PfConceptKey::new(name.clone(), render(a));
        let second = PfConceptKey::new(name, render(b));
        prop_assert_eq!(first.is_newer_than(&second), a > b);
    }

    /// Property: timestamp keys keep millisecond precision and bind their key columns in order
    #[test]
    fn timestamp_keys_truncate_to_millis(millis in 0i64..4_000_000_000_000, nanos in 0u32..1_000_000) {
        let instant = Utc.timestamp_millis_opt(millis).unwrap() + chrono::Duration::nanoseconds(i64::from(nanos));
        let key = PfTimestampKey::new("pdp-1", "1.0.0", instant);
        prop_assert_eq!(key.time_stamp().timestamp_millis(), millis);

        let columns: Vec<&str> = PfKey::from(key).column_values().into_iter().map(|(c, _)| c).collect();
        prop_assert_eq!(columns, vec!["name", "version", "time_stamp"]);
    }
}
