//! # Filter Subsystem
//!
//! Turns a [`PfFilterParameters`] descriptor into SQL fragments and bound
//! values for the entity being queried.
//!
//! A [`PfFilter`] produces:
//! - a `WHERE` clause over named placeholders (empty when nothing is filtered),
//! - an `ORDER BY` clause (empty when no ordering applies),
//! - the bindings for those placeholders plus the row limit, applied to a
//!   [`NamedQuery`].
//!
//! Which filter applies depends only on the entity's [`KeyShape`]; see
//! [`PfFilterFactory`].
//!
//! | placeholder | parameter | column |
//! |---|---|---|
//! | `:name` | `name` | name column of the shape |
//! | `:version` | `version` | version column of the shape |
//! | `:minVersion` / `:maxVersion` | `min_version` / `max_version` | `version_sort` |
//! | `:startTime` / `:endTime` | `start_time` / `end_time` | `time_stamp` |

pub mod factory;
pub mod non_timestamp;
pub mod reference_timestamp;
pub mod timestamp;

pub use factory::PfFilterFactory;
pub use non_timestamp::PfNonTimestampKeyFilter;
pub use reference_timestamp::PfReferenceTimestampKeyFilter;
pub use timestamp::PfTimestampKeyFilter;

use crate::constants::columns;
use crate::error::PfModelResult;
use crate::keys::{sortable_version, KeyShape};
use crate::query_builder::{order_clause_with_default, NamedQuery, SortOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NAME_PARAM: &str = "name";
const VERSION_PARAM: &str = "version";
const MIN_VERSION_PARAM: &str = "minVersion";
const MAX_VERSION_PARAM: &str = "maxVersion";
const START_TIME_PARAM: &str = "startTime";
const END_TIME_PARAM: &str = "endTime";

/// What to filter on. Every field is optional; an all-default value matches
/// every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PfFilterParameters {
    /// Exact (parent) name
    pub name: Option<String>,
    /// Exact (parent) version
    pub version: Option<String>,
    /// Inclusive lower version bound
    pub min_version: Option<String>,
    /// Inclusive upper version bound
    pub max_version: Option<String>,
    /// Inclusive lower time bound, timestamped keys only
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper time bound, timestamped keys only
    pub end_time: Option<DateTime<Utc>>,
    /// Key columns to order by, each optionally followed by a direction
    pub order_by: Option<String>,
    /// Direction for `order_by` terms that carry none, or for the default order
    pub sort_order: Option<SortOrder>,
    /// Maximum rows returned, zero for no limit
    pub record_num: usize,
}

impl PfFilterParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_version_range(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min_version = min.map(str::to_string);
        self.max_version = max.map(str::to_string);
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn with_record_num(mut self, record_num: usize) -> Self {
        self.record_num = record_num;
        self
    }
}

/// Translates filter parameters into query fragments for one key shape
pub trait PfFilter: Send + Sync {
    fn shape(&self) -> KeyShape;

    /// ` WHERE ...` with named placeholders, or empty
    fn gen_where_clause(&self, params: &PfFilterParameters) -> String;

    /// ` ORDER BY ...`, or empty
    fn gen_order_clause(&self, params: &PfFilterParameters) -> PfModelResult<String>;

    /// Bind every placeholder produced by `gen_where_clause` and set the row limit
    fn set_params(&self, query: &mut NamedQuery, params: &PfFilterParameters);
}

fn name_version_terms(shape: KeyShape, params: &PfFilterParameters) -> Vec<String> {
    let mut terms = Vec::new();
    if params.name.is_some() {
        terms.push(format!("{} = :{NAME_PARAM}", shape.name_column()));
    }
    if params.version.is_some() {
        terms.push(format!("{} = :{VERSION_PARAM}", shape.version_column()));
    }
    if params.min_version.is_some() {
        terms.push(format!("{} >= :{MIN_VERSION_PARAM}", columns::VERSION_SORT));
    }
    if params.max_version.is_some() {
        terms.push(format!("{} <= :{MAX_VERSION_PARAM}", columns::VERSION_SORT));
    }
    terms
}

fn time_terms(params: &PfFilterParameters) -> Vec<String> {
    let mut terms = Vec::new();
    if params.start_time.is_some() {
        terms.push(format!("{} >= :{START_TIME_PARAM}", columns::TIME_STAMP));
    }
    if params.end_time.is_some() {
        terms.push(format!("{} <= :{END_TIME_PARAM}", columns::TIME_STAMP));
    }
    terms
}

fn where_clause(terms: Vec<String>) -> String {
    if terms.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", terms.join(" AND "))
    }
}

fn bind_name_version(query: &mut NamedQuery, params: &PfFilterParameters) {
    if let Some(name) = &params.name {
        query.set_parameter(NAME_PARAM, name);
    }
    if let Some(version) = &params.version {
        query.set_parameter(VERSION_PARAM, version);
    }
    if let Some(min) = &params.min_version {
        query.set_parameter(MIN_VERSION_PARAM, sortable_version(min));
    }
    if let Some(max) = &params.max_version {
        query.set_parameter(MAX_VERSION_PARAM, sortable_version(max));
    }
    query.set_max_results(params.record_num);
}

fn bind_time(query: &mut NamedQuery, params: &PfFilterParameters) {
    if let Some(start) = params.start_time {
        query.set_parameter(START_TIME_PARAM, start);
    }
    if let Some(end) = params.end_time {
        query.set_parameter(END_TIME_PARAM, end);
    }
}

/// Order clause for a caller supplied `order_by`, if there is one
fn explicit_order(shape: KeyShape, params: &PfFilterParameters) -> Option<PfModelResult<String>> {
    let order_by = params.order_by.as_deref().filter(|o| !o.trim().is_empty())?;
    Some(order_clause_with_default(shape, order_by, params.sort_order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_match_everything() {
        let params = PfFilterParameters::new();
        assert!(name_version_terms(KeyShape::Concept, &params).is_empty());
        assert!(time_terms(&params).is_empty());
        assert_eq!(where_clause(Vec::new()), "");
    }

    #[test]
    fn test_parameters_deserialize_with_defaults() {
        let params: PfFilterParameters =
            serde_json::from_str(r#"{"name":"pdp-1","sort_order":"DESC","record_num":3}"#).unwrap();
        assert_eq!(params.name.as_deref(), Some("pdp-1"));
        assert_eq!(params.sort_order, Some(SortOrder::Descending));
        assert_eq!(params.record_num, 3);
        assert!(params.version.is_none());
    }

    #[test]
    fn test_explicit_order_applies_sort_order() {
        let params = PfFilterParameters::new()
            .with_order_by("name")
            .with_sort_order(SortOrder::Descending);
        assert_eq!(
            explicit_order(KeyShape::Concept, &params).unwrap().unwrap(),
            " ORDER BY name DESC"
        );
        assert!(explicit_order(KeyShape::Concept, &PfFilterParameters::new()).is_none());
    }

    #[test]
    fn test_explicit_direction_wins_over_sort_order() {
        let params = PfFilterParameters::new()
            .with_order_by("time_stamp DESC, name")
            .with_sort_order(SortOrder::Ascending);
        assert_eq!(
            explicit_order(KeyShape::Timestamp, &params).unwrap().unwrap(),
            " ORDER BY time_stamp DESC, name ASC"
        );
    }
}
