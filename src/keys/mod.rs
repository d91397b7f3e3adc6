//! # Concept Keys
//!
//! The four key shapes that identify persisted concepts, and the closed
//! tagged union [`PfKey`] the DAO dispatches on.
//!
//! | shape | identity | columns |
//! |---|---|---|
//! | [`PfConceptKey`] | name + version | `name`, `version` |
//! | [`PfReferenceKey`] | parent name + version + parent local name + local name | `parent_key_name`, `parent_key_version`, `parent_local_name`, `local_name` |
//! | [`PfTimestampKey`] | name + version + timestamp | `name`, `version`, `time_stamp` |
//! | [`PfReferenceTimestampKey`] | reference key + timestamp | reference columns + `time_stamp` |
//!
//! Keys are immutable values: equality is structural and ordering is
//! lexicographic over the fields.

pub mod concept_key;
pub mod reference_key;
pub mod reference_timestamp_key;
pub mod timestamp_key;

pub use concept_key::PfConceptKey;
pub use reference_key::PfReferenceKey;
pub use reference_timestamp_key::PfReferenceTimestampKey;
pub use timestamp_key::PfTimestampKey;

use crate::constants::columns;
use crate::constants::keys::{MAX_KEY_FIELD_LENGTH, VERSION_SEGMENT_WIDTH};
use crate::error::{PfModelError, PfModelResult};
use crate::query_builder::BindValue;
use serde::{Deserialize, Serialize};
use std::fmt;

const CONCEPT_COLUMNS: &[&str] = &[columns::NAME, columns::VERSION];
const REFERENCE_COLUMNS: &[&str] = &[
    columns::PARENT_KEY_NAME,
    columns::PARENT_KEY_VERSION,
    columns::PARENT_LOCAL_NAME,
    columns::LOCAL_NAME,
];
const TIMESTAMP_COLUMNS: &[&str] = &[columns::NAME, columns::VERSION, columns::TIME_STAMP];
const REFERENCE_TIMESTAMP_COLUMNS: &[&str] = &[
    columns::PARENT_KEY_NAME,
    columns::PARENT_KEY_VERSION,
    columns::PARENT_LOCAL_NAME,
    columns::LOCAL_NAME,
    columns::TIME_STAMP,
];

/// The shape of key an entity is identified by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyShape {
    Concept,
    Reference,
    Timestamp,
    ReferenceTimestamp,
}

impl KeyShape {
    /// Primary key columns, in declaration order
    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            KeyShape::Concept => CONCEPT_COLUMNS,
            KeyShape::Reference => REFERENCE_COLUMNS,
            KeyShape::Timestamp => TIMESTAMP_COLUMNS,
            KeyShape::ReferenceTimestamp => REFERENCE_TIMESTAMP_COLUMNS,
        }
    }

    /// Column holding the (parent) concept name
    pub fn name_column(self) -> &'static str {
        match self {
            KeyShape::Concept | KeyShape::Timestamp => columns::NAME,
            KeyShape::Reference | KeyShape::ReferenceTimestamp => columns::PARENT_KEY_NAME,
        }
    }

    /// Column holding the (parent) concept version
    pub fn version_column(self) -> &'static str {
        match self {
            KeyShape::Concept | KeyShape::Timestamp => columns::VERSION,
            KeyShape::Reference | KeyShape::ReferenceTimestamp => columns::PARENT_KEY_VERSION,
        }
    }

    pub fn timestamp_column(self) -> Option<&'static str> {
        match self {
            KeyShape::Timestamp | KeyShape::ReferenceTimestamp => Some(columns::TIME_STAMP),
            KeyShape::Concept | KeyShape::Reference => None,
        }
    }

    pub fn is_reference(self) -> bool {
        matches!(self, KeyShape::Reference | KeyShape::ReferenceTimestamp)
    }

    /// True when `column` may appear in an ORDER BY for this shape
    pub fn is_orderable(self, column: &str) -> bool {
        column == columns::VERSION_SORT || self.key_columns().contains(&column)
    }
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyShape::Concept => "PfConceptKey",
            KeyShape::Reference => "PfReferenceKey",
            KeyShape::Timestamp => "PfTimestampKey",
            KeyShape::ReferenceTimestamp => "PfReferenceTimestampKey",
        };
        f.write_str(name)
    }
}

/// Any of the four key shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "shape", content = "key", rename_all = "snake_case")]
pub enum PfKey {
    Concept(PfConceptKey),
    Reference(PfReferenceKey),
    Timestamp(PfTimestampKey),
    ReferenceTimestamp(PfReferenceTimestampKey),
}

impl PfKey {
    pub fn shape(&self) -> KeyShape {
        match self {
            PfKey::Concept(_) => KeyShape::Concept,
            PfKey::Reference(_) => KeyShape::Reference,
            PfKey::Timestamp(_) => KeyShape::Timestamp,
            PfKey::ReferenceTimestamp(_) => KeyShape::ReferenceTimestamp,
        }
    }

    pub fn id(&self) -> String {
        match self {
            PfKey::Concept(key) => key.id(),
            PfKey::Reference(key) => key.id(),
            PfKey::Timestamp(key) => key.id(),
            PfKey::ReferenceTimestamp(key) => key.id(),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            PfKey::Concept(key) => key.is_null(),
            PfKey::Reference(key) => key.is_null(),
            PfKey::Timestamp(key) => key.is_null(),
            PfKey::ReferenceTimestamp(key) => key.is_null(),
        }
    }

    pub fn validate(&self) -> PfModelResult<()> {
        match self {
            PfKey::Concept(key) => key.validate(),
            PfKey::Reference(key) => key.validate(),
            PfKey::Timestamp(key) => key.validate(),
            PfKey::ReferenceTimestamp(key) => key.validate(),
        }
    }

    /// Primary key column values in the order of [`KeyShape::key_columns`]
    pub fn column_values(&self) -> Vec<(&'static str, BindValue)> {
        let values: Vec<BindValue> = match self {
            PfKey::Concept(key) => vec![key.name().into(), key.version().into()],
            PfKey::Reference(key) => reference_values(key),
            PfKey::Timestamp(key) => vec![
                key.name().into(),
                key.version().into(),
                key.time_stamp().into(),
            ],
            PfKey::ReferenceTimestamp(key) => {
                let mut values = reference_values(key.reference_key());
                values.push(key.time_stamp().into());
                values
            }
        };
        self.shape()
            .key_columns()
            .iter()
            .copied()
            .zip(values)
            .collect()
    }

    /// Sortable rendering of the (parent) version, stored alongside the key
    pub fn version_sort(&self) -> String {
        let version = match self {
            PfKey::Concept(key) => key.version(),
            PfKey::Reference(key) => key.parent_key_version(),
            PfKey::Timestamp(key) => key.version(),
            PfKey::ReferenceTimestamp(key) => key.reference_key().parent_key_version(),
        };
        sortable_version(version)
    }
}

fn reference_values(key: &PfReferenceKey) -> Vec<BindValue> {
    vec![
        key.parent_key_name().into(),
        key.parent_key_version().into(),
        key.parent_local_name().into(),
        key.local_name().into(),
    ]
}

impl fmt::Display for PfKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.shape(), self.id())
    }
}

impl From<PfConceptKey> for PfKey {
    fn from(key: PfConceptKey) -> Self {
        PfKey::Concept(key)
    }
}

impl From<PfReferenceKey> for PfKey {
    fn from(key: PfReferenceKey) -> Self {
        PfKey::Reference(key)
    }
}

impl From<PfTimestampKey> for PfKey {
    fn from(key: PfTimestampKey) -> Self {
        PfKey::Timestamp(key)
    }
}

impl From<PfReferenceTimestampKey> for PfKey {
    fn from(key: PfReferenceTimestampKey) -> Self {
        PfKey::ReferenceTimestamp(key)
    }
}

/// Check a key name field: `[A-Za-z0-9-_.]+`, bounded length
pub(crate) fn validate_name(field: &str, value: &str) -> PfModelResult<()> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if value.is_empty() || !valid_chars {
        return Err(PfModelError::InvalidArgument(format!(
            "{field} \"{value}\" does not match [A-Za-z0-9-_.]+"
        )));
    }
    check_length(field, value)
}

/// Check a key version field: three dot separated unsigned integers
pub(crate) fn validate_version(field: &str, value: &str) -> PfModelResult<()> {
    if version_segments(value).is_none() {
        return Err(PfModelError::InvalidArgument(format!(
            "{field} \"{value}\" is not a version of the form <major>.<minor>.<patch>"
        )));
    }
    check_length(field, value)
}

fn check_length(field: &str, value: &str) -> PfModelResult<()> {
    if value.len() > MAX_KEY_FIELD_LENGTH {
        return Err(PfModelError::InvalidArgument(format!(
            "{field} is longer than {MAX_KEY_FIELD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub(crate) fn version_segments(version: &str) -> Option<[u64; 3]> {
    let mut parts = version.split('.');
    let mut segments = [0u64; 3];
    for segment in segments.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *segment = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(segments)
}

/// Zero-pad each numeric segment so that string order equals version order.
///
/// Segments are normalised through `u64`, so every valid segment renders at
/// exactly [`VERSION_SEGMENT_WIDTH`] digits. Anything else is kept as-is.
pub fn sortable_version(version: &str) -> String {
    version
        .split('.')
        .map(|segment| {
            let numeric = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            match segment.parse::<u64>() {
                Ok(value) if numeric => format!("{value:0>width$}", width = VERSION_SEGMENT_WIDTH),
                _ => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_shape_columns() {
        assert_eq!(KeyShape::Concept.key_columns(), &["name", "version"]);
        assert_eq!(KeyShape::Reference.name_column(), "parent_key_name");
        assert_eq!(KeyShape::ReferenceTimestamp.version_column(), "parent_key_version");
        assert_eq!(KeyShape::Timestamp.timestamp_column(), Some("time_stamp"));
        assert_eq!(KeyShape::Concept.timestamp_column(), None);
        assert!(KeyShape::Timestamp.is_orderable("version_sort"));
        assert!(!KeyShape::Concept.is_orderable("time_stamp"));
        assert!(!KeyShape::Concept.is_orderable("body"));
    }

    #[test]
    fn test_column_values_follow_shape_order() {
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key: PfKey = PfReferenceTimestampKey::new(
            PfReferenceKey::new(&PfConceptKey::new("parent", "1.0.0"), "child"),
            time,
        )
        .into();

        let values = key.column_values();
        let columns: Vec<_> = values.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, KeyShape::ReferenceTimestamp.key_columns());
        assert_eq!(values[0].1, BindValue::from("parent"));
        assert_eq!(values[4].1, BindValue::BigInt(1_700_000_000_123));
    }

    #[test]
    fn test_sortable_version_orders_numerically() {
        assert!(sortable_version("1.10.0") > sortable_version("1.9.0"));
        assert!(sortable_version("10.0.0") > sortable_version("9.99.99"));
        assert_eq!(
            sortable_version("0.0.1"),
            "00000000000000000000.00000000000000000000.00000000000000000001"
        );
        assert!(sortable_version("10000000000.0.0") > sortable_version("9999999999.0.0"));
        assert!(sortable_version("18446744073709551615.0.0") > sortable_version("10000000000.0.0"));
        assert_eq!(sortable_version("007.0.0"), sortable_version("7.0.0"));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("version", "1.0.0").is_ok());
        assert!(validate_version("version", "1.0").is_err());
        assert!(validate_version("version", "1.0.0.0").is_err());
        assert!(validate_version("version", "1.a.0").is_err());
        assert!(validate_name("name", "my-policy_type.v1").is_ok());
        assert!(validate_name("name", "bad name").is_err());
        assert!(validate_name("name", "").is_err());
    }

    #[test]
    fn test_key_display_includes_shape() {
        let key: PfKey = PfConceptKey::new("policy", "1.0.0").into();
        assert_eq!(key.to_string(), "PfConceptKey(policy:1.0.0)");
    }
}
