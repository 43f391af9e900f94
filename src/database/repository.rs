use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterWhereInfo, SqlParam};

/// A row type that maps one-to-one onto a table.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Applied when a read does not ask for an order, so listings are stable
    const DEFAULT_ORDER: &'static str;
}

pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, mut filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        if filter_data.order.is_none() {
            filter_data.order = Some(T::DEFAULT_ORDER.to_string());
        }
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .select_optional(&self.pool)
            .await
    }

    pub async fn select_404(&self, filter_data: FilterData) -> Result<T, DatabaseError> {
        self.select_one(filter_data)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No record found in {}", T::TABLE)))
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .count(&self.pool)
            .await
    }

    pub async fn select_ids<I>(&self, ids: I) -> Result<Vec<T>, DatabaseError>
    where
        I: IntoIterator,
        I::Item: Into<SqlParam>,
    {
        let mut ids: Vec<SqlParam> = ids.into_iter().map(Into::into).collect();
        ids.dedup();
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select_any(FilterData::conditions(vec![FilterWhereInfo::in_list("id", ids)]))
            .await
    }
}
