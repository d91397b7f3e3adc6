use super::{bind_name_version, explicit_order, name_version_terms, where_clause, PfFilter, PfFilterParameters};
use crate::constants::columns;
use crate::error::PfModelResult;
use crate::keys::KeyShape;
use crate::query_builder::{order_clause, NamedQuery, SortOrder};

/// Filter for concept-keyed and reference-keyed entities. Time bounds are
/// ignored because these rows carry no timestamp.
#[derive(Debug, Clone, Copy)]
pub struct PfNonTimestampKeyFilter {
    shape: KeyShape,
}

impl PfNonTimestampKeyFilter {
    pub fn concept() -> Self {
        Self {
            shape: KeyShape::Concept,
        }
    }

    pub fn reference() -> Self {
        Self {
            shape: KeyShape::Reference,
        }
    }
}

impl PfFilter for PfNonTimestampKeyFilter {
    fn shape(&self) -> KeyShape {
        self.shape
    }

    fn gen_where_clause(&self, params: &PfFilterParameters) -> String {
        where_clause(name_version_terms(self.shape, params))
    }

    fn gen_order_clause(&self, params: &PfFilterParameters) -> PfModelResult<String> {
        if let Some(order) = explicit_order(self.shape, params) {
            return order;
        }
        match params.sort_order {
            Some(direction) => order_clause(
                self.shape,
                &format!(
                    "{} {direction}, {} {direction}",
                    self.shape.name_column(),
                    columns::VERSION_SORT
                ),
            ),
            None if params.record_num > 0 => order_clause(
                self.shape,
                &format!(
                    "{}, {} {}",
                    self.shape.name_column(),
                    columns::VERSION_SORT,
                    SortOrder::Ascending
                ),
            ),
            None => Ok(String::new()),
        }
    }

    fn set_params(&self, query: &mut NamedQuery, params: &PfFilterParameters) {
        bind_name_version(query, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_concept_where_clause() {
        let params = PfFilterParameters::new()
            .with_name("onap.policies.Monitoring")
            .with_version_range(Some("1.0.0"), Some("2.0.0"))
            .with_start_time(Utc::now());
        assert_eq!(
            PfNonTimestampKeyFilter::concept().gen_where_clause(&params),
            " WHERE name = :name AND version_sort >= :minVersion AND version_sort <= :maxVersion"
        );
    }

    #[test]
    fn test_reference_filter_uses_parent_columns() {
        let params = PfFilterParameters::new().with_name("parent").with_version("1.0.0");
        assert_eq!(
            PfNonTimestampKeyFilter::reference().gen_where_clause(&params),
            " WHERE parent_key_name = :name AND parent_key_version = :version"
        );
    }

    #[test]
    fn test_order_defaults_to_name_and_version() {
        let filter = PfNonTimestampKeyFilter::concept();
        assert_eq!(filter.gen_order_clause(&PfFilterParameters::new()).unwrap(), "");
        assert_eq!(
            filter
                .gen_order_clause(&PfFilterParameters::new().with_sort_order(SortOrder::Descending))
                .unwrap(),
            " ORDER BY name DESC, version_sort DESC"
        );
        assert_eq!(
            filter
                .gen_order_clause(&PfFilterParameters::new().with_record_num(2))
                .unwrap(),
            " ORDER BY name, version_sort ASC"
        );
    }

    #[test]
    fn test_rejects_timestamp_ordering() {
        let params = PfFilterParameters::new().with_order_by("time_stamp");
        assert!(PfNonTimestampKeyFilter::concept().gen_order_clause(&params).is_err());
    }
}
