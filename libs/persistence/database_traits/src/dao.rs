use std::{fmt::Display, hash::Hash, sync::Arc};

use async_trait::async_trait;

/// Contract of an authoritative system of record for one entity kind.
///
/// Implementations are expected to be durable and to enforce id uniqueness;
/// caches layered on top only ever hold disposable projections of
/// `Self::Model`.
#[async_trait]
pub trait GenericDao: Send + Sync {
    type Model: Send + Sync + 'static;
    type ID: Clone + Hash + Display + Send + Sync + 'static;
    type Error: Send + 'static;

    /// Identifier carried by a model instance.
    fn id_of(model: &Self::Model) -> Self::ID;

    async fn insert(&self, model: &Self::Model) -> Result<Self::ID, Self::Error>;

    /// `Ok(None)` is a valid terminal outcome, not a failure.
    async fn find_by_id(
        &self, id: &Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error>;

    async fn update(&self, model: &Self::Model) -> Result<(), Self::Error>;

    async fn delete(&self, id: &Self::ID) -> Result<(), Self::Error>;
}

#[async_trait]
pub trait FilterDao: GenericDao {
    type Filters: Send + Sync;

    async fn find_by_filters(
        &self, filters: &Self::Filters,
    ) -> Result<Vec<Self::Model>, Self::Error>;
}

/// Atomic counter adjustment against the authoritative row.
#[async_trait]
pub trait InventoryDao: GenericDao {
    /// Adds `delta` to the stored ticket count and returns the new count.
    ///
    /// Must fail without side effects when the result would be negative.
    async fn update_ticket_count(
        &self, id: &Self::ID, delta: i32,
    ) -> Result<i32, Self::Error>;
}

#[async_trait]
impl<T> GenericDao for Arc<T>
where
    T: GenericDao,
{
    type Error = T::Error;
    type ID = T::ID;
    type Model = T::Model;

    fn id_of(model: &Self::Model) -> Self::ID { T::id_of(model) }

    async fn insert(&self, model: &Self::Model) -> Result<Self::ID, Self::Error> {
        (**self).insert(model).await
    }

    async fn find_by_id(
        &self, id: &Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error> {
        (**self).find_by_id(id).await
    }

    async fn update(&self, model: &Self::Model) -> Result<(), Self::Error> {
        (**self).update(model).await
    }

    async fn delete(&self, id: &Self::ID) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<T> FilterDao for Arc<T>
where
    T: FilterDao,
{
    type Filters = T::Filters;

    async fn find_by_filters(
        &self, filters: &Self::Filters,
    ) -> Result<Vec<Self::Model>, Self::Error> {
        (**self).find_by_filters(filters).await
    }
}

#[async_trait]
impl<T> InventoryDao for Arc<T>
where
    T: InventoryDao,
{
    async fn update_ticket_count(
        &self, id: &Self::ID, delta: i32,
    ) -> Result<i32, Self::Error> {
        (**self).update_ticket_count(id, delta).await
    }
}
