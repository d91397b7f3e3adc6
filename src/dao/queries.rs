//! Query templates shared by every entity. Each carries the table token and is
//! rendered against a registered entity name before execution.

use crate::constants::columns;
use crate::keys::{KeyShape, PfKey};
use crate::query_builder::{NamedQuery, QueryTemplate};

pub(crate) const SELECT_ALL: &str = "SELECT body FROM __TABLE__";
pub(crate) const DELETE_ALL: &str = "DELETE FROM __TABLE__";
pub(crate) const COUNT_ALL: &str = "SELECT COUNT(*) FROM __TABLE__";

pub(crate) const NAME_PARAM: &str = "name";
pub(crate) const VERSION_PARAM: &str = "version";
pub(crate) const PARENT_NAME_PARAM: &str = "parentName";
pub(crate) const PARENT_VERSION_PARAM: &str = "parentVersion";
const VERSION_SORT_PARAM: &str = "versionSort";
const BODY_PARAM: &str = "body";

/// ` WHERE a = :a AND b = :b`, parameter names equal to column names
pub(crate) fn key_where(columns: &[&str]) -> String {
    let terms: Vec<String> = columns.iter().map(|column| format!("{column} = :{column}")).collect();
    format!(" WHERE {}", terms.join(" AND "))
}

pub(crate) fn select_by_key(key: &PfKey) -> QueryTemplate {
    QueryTemplate::new(SELECT_ALL).push(&key_where(&key_columns_of(key)))
}

pub(crate) fn delete_by_key(key: &PfKey) -> QueryTemplate {
    QueryTemplate::new(DELETE_ALL).push(&key_where(&key_columns_of(key)))
}

pub(crate) fn select_all_versions(shape: KeyShape) -> QueryTemplate {
    QueryTemplate::new(SELECT_ALL).push(&format!(" WHERE {} = :{NAME_PARAM}", shape.name_column()))
}

pub(crate) fn select_all_versions_by_parent() -> QueryTemplate {
    QueryTemplate::new(SELECT_ALL).push(&format!(
        " WHERE {} = :{PARENT_NAME_PARAM}",
        columns::PARENT_KEY_NAME
    ))
}

pub(crate) fn select_all_for_parent() -> QueryTemplate {
    QueryTemplate::new(SELECT_ALL).push(&format!(
        " WHERE {} = :{PARENT_NAME_PARAM} AND {} = :{PARENT_VERSION_PARAM}",
        columns::PARENT_KEY_NAME,
        columns::PARENT_KEY_VERSION
    ))
}

/// Insert, or replace the stored body when the primary key already exists
pub(crate) fn upsert(shape: KeyShape) -> QueryTemplate {
    let key_columns = shape.key_columns();
    let placeholders: Vec<String> = key_columns.iter().map(|column| format!(":{column}")).collect();
    QueryTemplate::new(format!(
        "INSERT INTO __TABLE__ ({keys}, {sort}, {body}) VALUES ({values}, :{VERSION_SORT_PARAM}, :{BODY_PARAM}) \
         ON CONFLICT ({keys}) DO UPDATE SET {sort} = excluded.{sort}, {body} = excluded.{body}",
        keys = key_columns.join(", "),
        values = placeholders.join(", "),
        sort = columns::VERSION_SORT,
        body = columns::BODY,
    ))
}

/// Bind every key column of `key` under its column name
pub(crate) fn bind_key(query: &mut NamedQuery, key: &PfKey) {
    for (column, value) in key.column_values() {
        query.set_parameter(column, value);
    }
}

pub(crate) fn bind_row(query: &mut NamedQuery, key: &PfKey, body: String) {
    bind_key(query, key);
    query
        .set_parameter(VERSION_SORT_PARAM, key.version_sort())
        .set_parameter(BODY_PARAM, body);
}

fn key_columns_of(key: &PfKey) -> Vec<&'static str> {
    key.column_values().into_iter().map(|(column, _)| column).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{PfConceptKey, PfReferenceKey};
    use crate::persistence::EntityDescriptor;

    #[test]
    fn test_upsert_for_concept_shape() {
        let entity = EntityDescriptor::new("ToscaPolicyType", KeyShape::Concept)
            .entity_name()
            .unwrap();
        let key: PfKey = PfConceptKey::new("onap.policies.Monitoring", "1.0.0").into();
        let mut query = upsert(KeyShape::Concept).render(&entity);
        bind_row(&mut query, &key, "{}".to_string());

        let (sql, values) = query.to_positional().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO ToscaPolicyType (name, version, version_sort, body) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name, version) DO UPDATE SET version_sort = excluded.version_sort, body = excluded.body"
        );
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_select_by_reference_key() {
        let entity = EntityDescriptor::new("ToscaProperty", KeyShape::Reference)
            .entity_name()
            .unwrap();
        let parent = PfConceptKey::new("onap.policies.Monitoring", "1.0.0");
        let key: PfKey = PfReferenceKey::new(&parent, "threshold").into();
        let mut query = select_by_key(&key).render(&entity);
        bind_key(&mut query, &key);

        let (sql, values) = query.to_positional().unwrap();
        assert_eq!(
            sql,
            "SELECT body FROM ToscaProperty WHERE parent_key_name = $1 AND parent_key_version = $2 \
             AND parent_local_name = $3 AND local_name = $4"
        );
        assert_eq!(values[3], crate::query_builder::BindValue::from("threshold"));
    }

    #[test]
    fn test_concept_key_against_timestamp_table() {
        let key: PfKey = PfConceptKey::new("pdp-1", "1.0.0").into();
        assert_eq!(
            select_by_key(&key).text(),
            "SELECT body FROM __TABLE__ WHERE name = :name AND version = :version"
        );
    }
}
