use super::{
    bind_name_version, bind_time, explicit_order, name_version_terms, time_terms, where_clause, PfFilter,
    PfFilterParameters,
};
use crate::constants::columns;
use crate::error::PfModelResult;
use crate::keys::KeyShape;
use crate::query_builder::{order_clause, NamedQuery, SortOrder};

/// Filter for timestamp-keyed entities: name/version plus a time window.
///
/// Without an explicit `order_by`, rows are ordered by `time_stamp` whenever a
/// sort order or a record limit is requested; a bare limit returns the most
/// recent rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PfTimestampKeyFilter;

impl PfFilter for PfTimestampKeyFilter {
    fn shape(&self) -> KeyShape {
        KeyShape::Timestamp
    }

    fn gen_where_clause(&self, params: &PfFilterParameters) -> String {
        let mut terms = name_version_terms(KeyShape::Timestamp, params);
        terms.extend(time_terms(params));
        where_clause(terms)
    }

    fn gen_order_clause(&self, params: &PfFilterParameters) -> PfModelResult<String> {
        timestamp_order(KeyShape::Timestamp, params)
    }

    fn set_params(&self, query: &mut NamedQuery, params: &PfFilterParameters) {
        bind_name_version(query, params);
        bind_time(query, params);
    }
}

pub(super) fn timestamp_order(shape: KeyShape, params: &PfFilterParameters) -> PfModelResult<String> {
    if let Some(order) = explicit_order(shape, params) {
        return order;
    }
    let direction = match (params.sort_order, params.record_num) {
        (Some(direction), _) => direction,
        (None, 0) => return Ok(String::new()),
        (None, _) => SortOrder::Descending,
    };
    order_clause(shape, &format!("{} {direction}", columns::TIME_STAMP))
}
