//! Table-generic CRUD and paging.
//!
//! Statements are assembled with [`QueryBuilder`]. Identifiers come only
//! from an [`Entity`]'s static column lists; every value is bound.

use shared::pagination::{escape_like, PaginationRequest, DEFAULT_ORDER_BY};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::timing::QueryTimer;

/// Describes a table to [`Repository`].
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;

    /// Every column, in insert order. The first one is the primary key.
    const COLUMNS: &'static [&'static str];

    /// Column matched by the free-text search.
    const SEARCH_COLUMN: &'static str;

    /// Columns a listing may be ordered by.
    const SORTABLE_COLUMNS: &'static [&'static str];

    fn id(&self) -> Uuid;

    /// Binds one value per entry in [`Entity::COLUMNS`], in the same order.
    fn push_values<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>);

    /// Pushes `column = value` pairs for every mutable column.
    fn push_assignments<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// Quotes an identifier. `type` is reserved in SQL.
fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

fn column_list<E: Entity>() -> String {
    E::COLUMNS
        .iter()
        .map(|c| quote(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_from<E: Entity>() -> String {
    format!("SELECT {} FROM {}", column_list::<E>(), quote(E::TABLE))
}

/// Pushes `"column" = $n` into an UPDATE's SET list.
pub fn push_assignment<'args, T>(
    row: &mut Separated<'_, 'args, Postgres, &'static str>,
    column: &str,
    value: T,
) where
    T: 'args + Encode<'args, Postgres> + Send + Type<Postgres>,
{
    row.push(format!("{} = ", quote(column)));
    row.push_bind_unseparated(value);
}

fn push_search(qb: &mut QueryBuilder<'_, Postgres>, column: &str, search: &str) {
    if search.is_empty() {
        return;
    }
    qb.push(" WHERE ")
        .push(quote(column))
        .push(" ILIKE ")
        .push_bind(format!("%{}%", escape_like(search)));
}

/// CRUD over the table described by `E`.
pub struct Repository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a row and returns it as stored.
    pub async fn create(&self, entity: &E) -> Result<E, sqlx::Error> {
        let timer = QueryTimer::new(format!("{}.create", E::TABLE));

        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            quote(E::TABLE),
            column_list::<E>()
        ));
        entity.push_values(&mut qb.separated(", "));
        qb.push(") RETURNING ").push(column_list::<E>());

        let result = qb.build_query_as::<E>().fetch_one(&self.pool).await;
        timer.record();
        result
    }

    /// Overwrites the mutable columns of an existing row.
    ///
    /// Fails with [`sqlx::Error::RowNotFound`] when the id matches nothing.
    pub async fn update(&self, entity: &E) -> Result<E, sqlx::Error> {
        let timer = QueryTimer::new(format!("{}.update", E::TABLE));

        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", quote(E::TABLE)));
        entity.push_assignments(&mut qb.separated(", "));
        qb.push(" WHERE \"id\" = ")
            .push_bind(entity.id())
            .push(" RETURNING ")
            .push(column_list::<E>());

        let result = qb
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .and_then(|row| row.ok_or(sqlx::Error::RowNotFound));
        timer.record();
        result
    }

    /// Hard-deletes a row.
    ///
    /// Fails with [`sqlx::Error::RowNotFound`] when the id matches nothing.
    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new(format!("{}.delete", E::TABLE));

        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE \"id\" = ", quote(E::TABLE)));
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await;
        timer.record();

        if result?.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<E, sqlx::Error> {
        let timer = QueryTimer::new(format!("{}.find_by_id", E::TABLE));

        let mut qb = QueryBuilder::new(select_from::<E>());
        qb.push(" WHERE \"id\" = ").push_bind(id);

        let result = qb.build_query_as::<E>().fetch_one(&self.pool).await;
        timer.record();
        result
    }

    /// Rows whose `column` is any of `ids`, oldest first.
    pub async fn find_where_in(&self, column: &str, ids: &[Uuid]) -> Result<Vec<E>, sqlx::Error> {
        if !E::COLUMNS.contains(&column) {
            return Err(sqlx::Error::ColumnNotFound(column.to_string()));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new(format!("{}.find_where_in", E::TABLE));

        let mut qb = QueryBuilder::new(select_from::<E>());
        qb.push(" WHERE ")
            .push(quote(column))
            .push(" = ANY(")
            .push_bind(ids.to_vec())
            .push(") ORDER BY \"created_at\" ASC, \"id\" ASC");

        let result = qb.build_query_as::<E>().fetch_all(&self.pool).await;
        timer.record();
        result
    }

    /// Number of rows whose `column` equals `value` exactly.
    pub async fn count_where(&self, column: &str, value: &str) -> Result<i64, sqlx::Error> {
        if !E::COLUMNS.contains(&column) {
            return Err(sqlx::Error::ColumnNotFound(column.to_string()));
        }

        let timer = QueryTimer::new(format!("{}.count_where", E::TABLE));

        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", quote(E::TABLE)));
        qb.push(" WHERE ")
            .push(quote(column))
            .push(" = ")
            .push_bind(value.to_string());

        let result = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await;
        timer.record();
        result
    }

    /// One page of rows matching the search term, plus the overall match count.
    ///
    /// An `order_by` outside [`Entity::SORTABLE_COLUMNS`] falls back to
    /// `created_at`; callers are expected to have rejected it already.
    pub async fn find_all(&self, pagination: &PaginationRequest) -> Result<(Vec<E>, i64), sqlx::Error> {
        let timer = QueryTimer::new(format!("{}.find_all", E::TABLE));
        let search = pagination.search.trim();

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", quote(E::TABLE)));
        push_search(&mut count_qb, E::SEARCH_COLUMN, search);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let order_by = E::SORTABLE_COLUMNS
            .iter()
            .find(|c| **c == pagination.order_by)
            .copied()
            .unwrap_or(DEFAULT_ORDER_BY);

        let mut qb = QueryBuilder::new(select_from::<E>());
        push_search(&mut qb, E::SEARCH_COLUMN, search);
        qb.push(" ORDER BY ")
            .push(quote(order_by))
            .push(" ")
            .push(pagination.sort_by.as_sql())
            .push(", \"id\" ASC LIMIT ")
            .push_bind(pagination.limit)
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = qb.build_query_as::<E>().fetch_all(&self.pool).await;
        timer.record();
        Ok((rows?, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DeviceEntity, SensorEntity};

    #[test]
    fn test_select_quotes_reserved_columns() {
        let sql = select_from::<SensorEntity>();
        assert_eq!(
            sql,
            "SELECT \"id\", \"device_id\", \"name\", \"type\", \"unit\", \"is_active\", \
             \"created_at\", \"updated_at\" FROM \"sensors\""
        );
    }

    #[test]
    fn test_search_clause_binds_escaped_term() {
        let mut qb = QueryBuilder::new(select_from::<DeviceEntity>());
        push_search(&mut qb, DeviceEntity::SEARCH_COLUMN, "50%");
        assert!(qb.sql().ends_with(" WHERE \"name\" ILIKE $1"));
    }

    #[test]
    fn test_empty_search_adds_no_filter() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1");
        push_search(&mut qb, "name", "");
        assert_eq!(qb.sql(), "SELECT 1");
    }

    #[test]
    fn test_update_assignments_sql() {
        let entity = DeviceEntity {
            id: Uuid::new_v4(),
            name: "Gateway".into(),
            location: None,
            status: "active".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE \"devices\" SET ");
        entity.push_assignments(&mut qb.separated(", "));
        assert_eq!(
            qb.sql(),
            "UPDATE \"devices\" SET \"name\" = $1, \"location\" = $2, \"status\" = $3, \"updated_at\" = $4"
        );
    }
}
