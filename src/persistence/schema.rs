//! Table generation for the entities of a persistence unit.

use super::{EntityDescriptor, PersistenceUnit};
use crate::constants::columns;
use crate::constants::keys::MAX_KEY_FIELD_LENGTH;
use crate::error::PfModelResult;
use serde::{Deserialize, Serialize};
use sqlx::any::Any;
use sqlx::AnyConnection;
use tracing::debug;

/// What to do with entity tables when a DAO is initialised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaGeneration {
    /// Tables are managed externally
    #[default]
    None,
    /// `CREATE TABLE IF NOT EXISTS` for every entity
    Create,
    /// Drop every entity table, then create it
    DropAndCreate,
}

/// DDL creating the table of one entity
pub fn create_table_sql(descriptor: &EntityDescriptor) -> PfModelResult<String> {
    let table = descriptor.entity_name()?;
    let shape = descriptor.shape();

    let mut definitions: Vec<String> = shape
        .key_columns()
        .iter()
        .map(|column| {
            if *column == columns::TIME_STAMP {
                format!("{column} BIGINT NOT NULL")
            } else {
                format!("{column} VARCHAR({MAX_KEY_FIELD_LENGTH}) NOT NULL")
            }
        })
        .collect();
    definitions.push(format!(
        "{} VARCHAR({MAX_KEY_FIELD_LENGTH}) NOT NULL",
        columns::VERSION_SORT
    ));
    definitions.push(format!("{} TEXT NOT NULL", columns::BODY));
    definitions.push(format!("PRIMARY KEY ({})", shape.key_columns().join(", ")));

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} ({})",
        definitions.join(", ")
    ))
}

pub fn drop_table_sql(descriptor: &EntityDescriptor) -> PfModelResult<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", descriptor.entity_name()?))
}

/// Apply `mode` to every entity of `unit` over `conn`
pub async fn generate_schema(
    conn: &mut AnyConnection,
    unit: &PersistenceUnit,
    mode: SchemaGeneration,
) -> PfModelResult<()> {
    if mode == SchemaGeneration::None {
        return Ok(());
    }

    for descriptor in unit.entities() {
        if mode == SchemaGeneration::DropAndCreate {
            let sql = drop_table_sql(descriptor)?;
            debug!(unit = %unit.name(), sql = %sql, "dropping entity table");
            sqlx::query::<Any>(&sql).execute(&mut *conn).await?;
        }
        let sql = create_table_sql(descriptor)?;
        debug!(unit = %unit.name(), sql = %sql, "creating entity table");
        sqlx::query::<Any>(&sql).execute(&mut *conn).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyShape;

    #[test]
    fn test_create_table_sql_for_reference_timestamp_shape() {
        let sql = create_table_sql(&EntityDescriptor::new("PolicyAudit", KeyShape::ReferenceTimestamp)).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS PolicyAudit (\
             parent_key_name VARCHAR(120) NOT NULL, \
             parent_key_version VARCHAR(120) NOT NULL, \
             parent_local_name VARCHAR(120) NOT NULL, \
             local_name VARCHAR(120) NOT NULL, \
             time_stamp BIGINT NOT NULL, \
             version_sort VARCHAR(120) NOT NULL, \
             body TEXT NOT NULL, \
             PRIMARY KEY (parent_key_name, parent_key_version, parent_local_name, local_name, time_stamp))"
        );
    }

    #[test]
    fn test_invalid_entity_name_produces_no_ddl() {
        assert!(create_table_sql(&EntityDescriptor::new("bad table", KeyShape::Concept)).is_err());
        assert!(drop_table_sql(&EntityDescriptor::new("bad table", KeyShape::Concept)).is_err());
    }

    #[test]
    fn test_schema_generation_deserializes_kebab_case() {
        let mode: SchemaGeneration = serde_yaml::from_str("drop-and-create").unwrap();
        assert_eq!(mode, SchemaGeneration::DropAndCreate);
        assert_eq!(SchemaGeneration::default(), SchemaGeneration::None);
    }
}
