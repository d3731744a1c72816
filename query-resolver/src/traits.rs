use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tower::BoxError;

use crate::context::Context;
use crate::error::ResolveError;
use crate::query::Query;
use crate::resolve::Resolved;

/// A QueryResolver can resolve a single query field.
///
/// Resolution never fails as a call: failures are carried by the returned [`Resolved`].
#[async_trait]
pub trait QueryResolver: Send + Sync {
    async fn resolve(&self, context: &Context, query: &dyn Query) -> Resolved;
}

/// A QueryRewriter builds the native query of the store from a GraphQL query field.
///
/// `None` means the field doesn't need a store query.
#[async_trait]
pub trait QueryRewriter<Q>: Send + Sync {
    async fn rewrite(&self, context: &Context, query: &dyn Query) -> Result<Option<Q>, BoxError>;
}

/// A QueryExecutor runs a native query and returns the raw result.
///
/// The result doesn't need to be a valid GraphQL result.
#[async_trait]
pub trait QueryExecutor<Q>: Send + Sync {
    async fn query(&self, context: &Context, query: Option<Q>) -> Result<Option<Bytes>, BoxError>;
}

/// A ResultCompleter shapes the raw result of a field into its response payload.
///
/// It is given the outcome of the previous stages whether they succeeded or not, and has the
/// final say on both the payload and the error the caller sees.
#[async_trait]
pub trait ResultCompleter: Send + Sync {
    async fn complete(
        &self,
        context: &Context,
        query: &dyn Query,
        result: Result<Option<Bytes>, ResolveError>,
    ) -> Resolved;
}

#[async_trait]
impl<T> QueryResolver for Arc<T>
where
    T: QueryResolver + ?Sized,
{
    async fn resolve(&self, context: &Context, query: &dyn Query) -> Resolved {
        (**self).resolve(context, query).await
    }
}

#[async_trait]
impl<Q, T> QueryRewriter<Q> for Arc<T>
where
    Q: Send + 'static,
    T: QueryRewriter<Q> + ?Sized,
{
    async fn rewrite(&self, context: &Context, query: &dyn Query) -> Result<Option<Q>, BoxError> {
        (**self).rewrite(context, query).await
    }
}

#[async_trait]
impl<Q, T> QueryExecutor<Q> for Arc<T>
where
    Q: Send + 'static,
    T: QueryExecutor<Q> + ?Sized,
{
    async fn query(&self, context: &Context, query: Option<Q>) -> Result<Option<Bytes>, BoxError> {
        (**self).query(context, query).await
    }
}

#[async_trait]
impl<T> ResultCompleter for Arc<T>
where
    T: ResultCompleter + ?Sized,
{
    async fn complete(
        &self,
        context: &Context,
        query: &dyn Query,
        result: Result<Option<Bytes>, ResolveError>,
    ) -> Resolved {
        (**self).complete(context, query, result).await
    }
}
