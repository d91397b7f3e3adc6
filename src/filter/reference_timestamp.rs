use super::timestamp::timestamp_order;
use super::{bind_name_version, bind_time, name_version_terms, time_terms, where_clause, PfFilter, PfFilterParameters};
use crate::error::PfModelResult;
use crate::keys::KeyShape;
use crate::query_builder::NamedQuery;

/// Filter for reference-timestamp-keyed entities. `name` and `version` match
/// the parent concept key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PfReferenceTimestampKeyFilter;

impl PfFilter for PfReferenceTimestampKeyFilter {
    fn shape(&self) -> KeyShape {
        KeyShape::ReferenceTimestamp
    }

    fn gen_where_clause(&self, params: &PfFilterParameters) -> String {
        let mut terms = name_version_terms(KeyShape::ReferenceTimestamp, params);
        terms.extend(time_terms(params));
        where_clause(terms)
    }

    fn gen_order_clause(&self, params: &PfFilterParameters) -> PfModelResult<String> {
        timestamp_order(KeyShape::ReferenceTimestamp, params)
    }

    fn set_params(&self, query: &mut NamedQuery, params: &PfFilterParameters) {
        bind_name_version(query, params);
        bind_time(query, params);
    }
}
