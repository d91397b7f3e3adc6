use super::queries;
use crate::concept::PfConcept;
use crate::constants::columns;
use crate::error::{PfModelError, PfModelResult, ResponseStatus};
use crate::filter::{PfFilterFactory, PfFilterParameters};
use crate::keys::{KeyShape, PfConceptKey, PfKey};
use crate::logging::log_database_operation;
use crate::persistence::{EntityName, PersistenceUnit};
use crate::query_builder::{order_clause, NamedQuery, QueryTemplate};
use sqlx::any::Any;
use sqlx::AnyConnection;
use sqlx::Row;
use std::time::Instant;
use tracing::{debug, warn};

/// DAO operations over one borrowed connection.
///
/// The connection may be a plain pooled connection or a transaction; the
/// session never begins or commits anything itself.
pub(crate) struct PfSession<'s> {
    conn: &'s mut AnyConnection,
    unit: &'s PersistenceUnit,
}

impl<'s> PfSession<'s> {
    pub(crate) fn new(conn: &'s mut AnyConnection, unit: &'s PersistenceUnit) -> Self {
        Self { conn, unit }
    }

    fn entity<T: PfConcept>(&self) -> PfModelResult<EntityName> {
        self.unit.entity_name::<T>()
    }

    pub(crate) async fn upsert<T: PfConcept>(&mut self, obj: &T) -> PfModelResult<PfKey> {
        let key = obj.key();
        check_shape::<T>(&key)?;
        if key.is_null() {
            return Err(PfModelError::InvalidArgument(format!(
                "cannot persist {} with a null key",
                T::ENTITY_NAME
            )));
        }
        key.validate()?;

        let mut query = queries::upsert(T::KEY_SHAPE).render(&self.entity::<T>()?);
        queries::bind_row(&mut query, &key, serde_json::to_string(obj)?);
        self.execute::<T>("upsert", &query).await?;
        Ok(key)
    }

    /// Upsert each object in turn, stopping at the first failure
    pub(crate) async fn upsert_all<T: PfConcept>(&mut self, objs: &[T]) -> PfModelResult<()> {
        for obj in objs {
            self.upsert(obj).await?;
        }
        Ok(())
    }

    /// Delete by each key in turn, returning the summed row count
    pub(crate) async fn delete_keys<T: PfConcept>(&mut self, keys: &[PfKey]) -> PfModelResult<u64> {
        let mut deleted = 0;
        for key in keys {
            deleted += self.delete_key::<T>(key).await?;
        }
        Ok(deleted)
    }

    pub(crate) async fn delete_key<T: PfConcept>(&mut self, key: &PfKey) -> PfModelResult<u64> {
        check_shape::<T>(key)?;
        let mut query = queries::delete_by_key(key).render(&self.entity::<T>()?);
        queries::bind_key(&mut query, key);
        self.execute::<T>("delete", &query).await
    }

    pub(crate) async fn delete_all<T: PfConcept>(&mut self) -> PfModelResult<u64> {
        let query = QueryTemplate::new(queries::DELETE_ALL).render(&self.entity::<T>()?);
        self.execute::<T>("delete_all", &query).await
    }

    pub(crate) async fn get<T: PfConcept>(&mut self, key: &PfKey) -> PfModelResult<Option<T>> {
        check_shape::<T>(key)?;
        let found = self.get_single::<T>(key).await?;
        found.map(|obj| copy_of(&obj)).transpose()
    }

    /// Equality lookup with a concept or reference key; timestamped entities
    /// match every instant of that key
    pub(crate) async fn get_concept<T: PfConcept>(&mut self, key: &PfKey) -> PfModelResult<Option<T>> {
        let applicable = match key {
            PfKey::Concept(_) => matches!(T::KEY_SHAPE, KeyShape::Concept | KeyShape::Timestamp),
            PfKey::Reference(_) => T::KEY_SHAPE.is_reference(),
            PfKey::Timestamp(_) | PfKey::ReferenceTimestamp(_) => false,
        };
        if !applicable {
            return Err(shape_mismatch::<T>(key));
        }
        let found = self.get_single::<T>(key).await?;
        found.map(|obj| copy_of(&obj)).transpose()
    }

    async fn get_single<T: PfConcept>(&mut self, key: &PfKey) -> PfModelResult<Option<T>> {
        let mut query = queries::select_by_key(key).render(&self.entity::<T>()?);
        queries::bind_key(&mut query, key);
        let mut rows: Vec<T> = self.fetch::<T>(&query).await?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            _ => Err(PfModelError::MultipleResults {
                entity: T::ENTITY_NAME.to_string(),
                filter: key.to_string(),
            }),
        }
    }

    pub(crate) async fn get_all<T: PfConcept>(&mut self) -> PfModelResult<Vec<T>> {
        let query = QueryTemplate::new(queries::SELECT_ALL).render(&self.entity::<T>()?);
        self.fetch_copies(&query).await
    }

    pub(crate) async fn get_all_for_parent<T: PfConcept>(
        &mut self,
        parent: &PfConceptKey,
    ) -> PfModelResult<Vec<T>> {
        require_reference::<T>("get_all_for_parent")?;
        let mut query = queries::select_all_for_parent().render(&self.entity::<T>()?);
        query
            .set_parameter(queries::PARENT_NAME_PARAM, parent.name())
            .set_parameter(queries::PARENT_VERSION_PARAM, parent.version());
        self.fetch_copies(&query).await
    }

    pub(crate) async fn get_all_ordered<T: PfConcept>(
        &mut self,
        order_by: Option<&str>,
        limit: usize,
    ) -> PfModelResult<Vec<T>> {
        let order = match order_by {
            Some(order_by) => order_clause(T::KEY_SHAPE, order_by)?,
            None => String::new(),
        };
        let mut query = QueryTemplate::new(queries::SELECT_ALL)
            .push(&order)
            .render(&self.entity::<T>()?);
        query.set_max_results(limit);
        self.fetch_copies(&query).await
    }

    pub(crate) async fn get_all_versions<T: PfConcept>(&mut self, name: &str) -> PfModelResult<Vec<T>> {
        if T::KEY_SHAPE.is_reference() {
            return Err(PfModelError::InvalidArgument(format!(
                "get_all_versions is not applicable to {} keyed by {}, use get_all_versions_by_parent",
                T::ENTITY_NAME,
                T::KEY_SHAPE
            )));
        }
        let mut query = queries::select_all_versions(T::KEY_SHAPE).render(&self.entity::<T>()?);
        query.set_parameter(queries::NAME_PARAM, name);
        self.fetch_copies(&query).await
    }

    pub(crate) async fn get_all_versions_by_parent<T: PfConcept>(
        &mut self,
        parent_name: &str,
    ) -> PfModelResult<Vec<T>> {
        require_reference::<T>("get_all_versions_by_parent")?;
        let mut query = queries::select_all_versions_by_parent().render(&self.entity::<T>()?);
        query.set_parameter(queries::PARENT_NAME_PARAM, parent_name);
        self.fetch_copies(&query).await
    }

    pub(crate) async fn get_filtered<T: PfConcept>(
        &mut self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> PfModelResult<Vec<T>> {
        match (name, version) {
            (None, _) => self.get_all::<T>().await,
            (Some(name), None) => self.get_all_versions::<T>(name).await,
            (Some(name), Some(version)) => {
                let key = PfKey::from(PfConceptKey::new(name, version));
                Ok(self.get::<T>(&key).await?.into_iter().collect())
            }
        }
    }

    /// Rows are returned as decoded, without the defensive copy
    pub(crate) async fn get_filtered_by_params<T: PfConcept>(
        &mut self,
        params: &PfFilterParameters,
    ) -> PfModelResult<Vec<T>> {
        let filter = PfFilterFactory::filter_for::<T>();
        let mut query = QueryTemplate::new(queries::SELECT_ALL)
            .push(&filter.gen_where_clause(params))
            .push(&filter.gen_order_clause(params)?)
            .render(&self.entity::<T>()?);
        filter.set_params(&mut query, params);
        self.fetch(&query).await
    }

    pub(crate) async fn size<T: PfConcept>(&mut self) -> PfModelResult<u64> {
        let query = QueryTemplate::new(queries::COUNT_ALL).render(&self.entity::<T>()?);
        let (sql, values) = query.to_positional()?;
        debug!(entity = T::ENTITY_NAME, sql = %sql, "counting rows");

        let mut statement = sqlx::query::<Any>(&sql);
        for value in values {
            statement = value.bind_to(statement);
        }
        let row = statement.fetch_one(&mut *self.conn).await?;
        let count: i64 = row.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Update then read back what the store now holds
    pub(crate) async fn update<T: PfConcept>(&mut self, obj: &T) -> PfModelResult<T> {
        let key = self.upsert(obj).await?;
        self.get::<T>(&key).await?.ok_or_else(|| {
            PfModelError::model(
                ResponseStatus::InternalServerError,
                format!("{} {key} not found after update", T::ENTITY_NAME),
            )
        })
    }

    async fn execute<T: PfConcept>(&mut self, operation: &str, query: &NamedQuery) -> PfModelResult<u64> {
        let (sql, values) = query.to_positional()?;
        debug!(entity = T::ENTITY_NAME, sql = %sql, parameters = ?query.parameters(), "executing statement");

        let started = Instant::now();
        let mut statement = sqlx::query::<Any>(&sql);
        for value in values {
            statement = value.bind_to(statement);
        }
        let rows = statement.execute(&mut *self.conn).await?.rows_affected();
        log_database_operation(T::ENTITY_NAME, operation, Some(rows), started.elapsed().as_millis());
        Ok(rows)
    }

    async fn fetch<T: PfConcept>(&mut self, query: &NamedQuery) -> PfModelResult<Vec<T>> {
        let (sql, values) = query.to_positional()?;
        debug!(entity = T::ENTITY_NAME, sql = %sql, parameters = ?query.parameters(), "executing query");

        let started = Instant::now();
        let mut statement = sqlx::query::<Any>(&sql);
        for value in values {
            statement = value.bind_to(statement);
        }
        let rows = statement.fetch_all(&mut *self.conn).await?;
        log_database_operation(
            T::ENTITY_NAME,
            "select",
            Some(rows.len() as u64),
            started.elapsed().as_millis(),
        );

        rows.iter()
            .map(|row| -> PfModelResult<T> {
                let body: String = row.try_get(columns::BODY)?;
                Ok(serde_json::from_str(&body)?)
            })
            .collect()
    }

    async fn fetch_copies<T: PfConcept>(&mut self, query: &NamedQuery) -> PfModelResult<Vec<T>> {
        self.fetch::<T>(query).await?.iter().map(copy_of).collect()
    }
}

fn copy_of<T: PfConcept>(obj: &T) -> PfModelResult<T> {
    obj.copy_concept().map_err(|e| {
        warn!(entity = T::ENTITY_NAME, key = %obj.key(), error = %e, "Could not copy object");
        PfModelError::from(e)
    })
}

fn check_shape<T: PfConcept>(key: &PfKey) -> PfModelResult<()> {
    if key.shape() == T::KEY_SHAPE {
        Ok(())
    } else {
        Err(shape_mismatch::<T>(key))
    }
}

fn shape_mismatch<T: PfConcept>(key: &PfKey) -> PfModelError {
    PfModelError::InvalidArgument(format!(
        "key {key} cannot address {} keyed by {}",
        T::ENTITY_NAME,
        T::KEY_SHAPE
    ))
}

fn require_reference<T: PfConcept>(operation: &str) -> PfModelResult<()> {
    if T::KEY_SHAPE.is_reference() {
        Ok(())
    } else {
        Err(PfModelError::InvalidArgument(format!(
            "{operation} is only applicable to entities with a parent key, {} is keyed by {}",
            T::ENTITY_NAME,
            T::KEY_SHAPE
        )))
    }
}
