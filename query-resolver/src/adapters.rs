//! Adapters implementing the resolution traits from closures, and the canonical
//! implementations for fields which don't need the store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use tower::BoxError;

use crate::context::Context;
use crate::error::ResolveError;
use crate::query::Introspector;
use crate::query::Query;
use crate::resolve::Resolved;
use crate::traits::QueryExecutor;
use crate::traits::QueryResolver;
use crate::traits::QueryRewriter;
use crate::traits::ResultCompleter;

/// Builds a [`QueryResolver`] from a function.
#[derive(Clone)]
pub struct QueryResolverFn<F>(F);

impl<F> QueryResolverFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn Query) -> BoxFuture<'a, Resolved> + Send + Sync,
{
    pub fn new(resolve: F) -> Self {
        Self(resolve)
    }
}

#[async_trait]
impl<F> QueryResolver for QueryResolverFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn Query) -> BoxFuture<'a, Resolved> + Send + Sync,
{
    async fn resolve(&self, context: &Context, query: &dyn Query) -> Resolved {
        (self.0)(context, query).await
    }
}

/// Builds a [`QueryRewriter`] from a function.
#[derive(Clone)]
pub struct QueryRewritingFn<F>(F);

impl<F> QueryRewritingFn<F> {
    pub fn new<Q>(rewrite: F) -> Self
    where
        F: for<'a> Fn(&'a Context, &'a dyn Query) -> BoxFuture<'a, Result<Option<Q>, BoxError>>
            + Send
            + Sync,
    {
        Self(rewrite)
    }
}

#[async_trait]
impl<Q, F> QueryRewriter<Q> for QueryRewritingFn<F>
where
    Q: Send + 'static,
    F: for<'a> Fn(&'a Context, &'a dyn Query) -> BoxFuture<'a, Result<Option<Q>, BoxError>>
        + Send
        + Sync,
{
    async fn rewrite(&self, context: &Context, query: &dyn Query) -> Result<Option<Q>, BoxError> {
        (self.0)(context, query).await
    }
}

/// Builds a [`QueryExecutor`] from a function.
#[derive(Clone)]
pub struct QueryExecutionFn<F>(F);

impl<F> QueryExecutionFn<F> {
    pub fn new<Q>(execute: F) -> Self
    where
        F: for<'a> Fn(&'a Context, Option<Q>) -> BoxFuture<'a, Result<Option<Bytes>, BoxError>>
            + Send
            + Sync,
    {
        Self(execute)
    }
}

#[async_trait]
impl<Q, F> QueryExecutor<Q> for QueryExecutionFn<F>
where
    Q: Send + 'static,
    F: for<'a> Fn(&'a Context, Option<Q>) -> BoxFuture<'a, Result<Option<Bytes>, BoxError>>
        + Send
        + Sync,
{
    async fn query(&self, context: &Context, query: Option<Q>) -> Result<Option<Bytes>, BoxError> {
        (self.0)(context, query).await
    }
}

/// Builds a [`ResultCompleter`] from a function.
#[derive(Clone)]
pub struct ResultCompletionFn<F>(F);

impl<F> ResultCompletionFn<F>
where
    F: for<'a> Fn(
            &'a Context,
            &'a dyn Query,
            Result<Option<Bytes>, ResolveError>,
        ) -> BoxFuture<'a, Resolved>
        + Send
        + Sync,
{
    pub fn new(complete: F) -> Self {
        Self(complete)
    }
}

#[async_trait]
impl<F> ResultCompleter for ResultCompletionFn<F>
where
    F: for<'a> Fn(
            &'a Context,
            &'a dyn Query,
            Result<Option<Bytes>, ResolveError>,
        ) -> BoxFuture<'a, Resolved>
        + Send
        + Sync,
{
    async fn complete(
        &self,
        context: &Context,
        query: &dyn Query,
        result: Result<Option<Bytes>, ResolveError>,
    ) -> Resolved {
        (self.0)(context, query, result).await
    }
}

/// Rewrites every field to no native query.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpRewriter;

#[async_trait]
impl<Q> QueryRewriter<Q> for NoOpRewriter
where
    Q: Send + 'static,
{
    async fn rewrite(&self, _context: &Context, _query: &dyn Query) -> Result<Option<Q>, BoxError> {
        Ok(None)
    }
}

/// Executes nothing and returns no result.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpExecutor;

#[async_trait]
impl<Q> QueryExecutor<Q> for NoOpExecutor
where
    Q: Send + 'static,
{
    async fn query(&self, _context: &Context, _query: Option<Q>) -> Result<Option<Bytes>, BoxError> {
        Ok(None)
    }
}

/// Answers with the introspection of the field it was created for, whatever native query it is
/// given.
#[derive(Clone)]
pub struct IntrospectionExecutor {
    query: Arc<dyn Query>,
    introspector: Arc<dyn Introspector>,
}

impl IntrospectionExecutor {
    pub fn new(query: Arc<dyn Query>, introspector: Arc<dyn Introspector>) -> Self {
        Self {
            query,
            introspector,
        }
    }
}

#[async_trait]
impl<Q> QueryExecutor<Q> for IntrospectionExecutor
where
    Q: Send + 'static,
{
    async fn query(&self, _context: &Context, _query: Option<Q>) -> Result<Option<Bytes>, BoxError> {
        self.introspector.introspect(self.query.as_ref()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::test_utils::TestQuery;

    fn introspector() -> Arc<dyn Introspector> {
        Arc::new(|query: &dyn Query| -> Result<Bytes, BoxError> {
            Ok(Bytes::from(format!(r#"{{"{}":{{"name":"Query"}}}}"#, query.response_name())))
        })
    }

    #[tokio::test]
    async fn no_op_rewriter_returns_no_native_query() {
        let rewritten: Option<String> = NoOpRewriter
            .rewrite(&Context::new(), &TestQuery::new("__schema"))
            .await
            .unwrap();
        assert!(rewritten.is_none());
    }

    #[tokio::test]
    async fn no_op_executor_returns_no_result() {
        let result = QueryExecutor::<String>::query(&NoOpExecutor, &Context::new(), None)
            .await
            .unwrap();
        assert!(result.is_none());

        let result = NoOpExecutor
            .query(&Context::new(), Some("{ q(func: has(name)) { name } }".to_owned()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn introspection_executor_ignores_its_input() {
        let executor = IntrospectionExecutor::new(Arc::new(TestQuery::new("__type")), introspector());

        let expected = Some(Bytes::from_static(br#"{"__type":{"name":"Query"}}"#));
        assert_eq!(
            QueryExecutor::<String>::query(&executor, &Context::new(), None)
                .await
                .unwrap(),
            expected
        );
        assert_eq!(
            executor
                .query(&Context::new(), Some("anything".to_owned()))
                .await
                .unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn introspection_executor_surfaces_introspection_errors() {
        let failing: Arc<dyn Introspector> =
            Arc::new(|_: &dyn Query| -> Result<Bytes, BoxError> { Err("unknown type".into()) });
        let executor = IntrospectionExecutor::new(Arc::new(TestQuery::new("__type")), failing);

        let error = QueryExecutor::<String>::query(&executor, &Context::new(), None)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "unknown type");
    }

    #[tokio::test]
    async fn function_adapters() {
        let rewriter = QueryRewritingFn::new(|_context: &Context, query: &dyn Query| {
            let rewritten = format!("{{ {}(func: uid(0x1)) {{ uid }} }}", query.name());
            async move { Ok::<_, BoxError>(Some(rewritten)) }.boxed()
        });
        let executor = QueryExecutionFn::new(|_context: &Context, query: Option<String>| {
            async move { Ok::<_, BoxError>(query.map(Bytes::from)) }.boxed()
        });
        let resolver = QueryResolverFn::new(|_context: &Context, query: &dyn Query| {
            let data = Bytes::from(query.response_name().to_owned());
            async move { Resolved::from_data(data) }.boxed()
        });

        let context = Context::new();
        let query = TestQuery::new("hero");
        let native_query = rewriter.rewrite(&context, &query).await.unwrap();
        assert_eq!(native_query.as_deref(), Some("{ hero(func: uid(0x1)) { uid } }"));
        assert_eq!(
            executor.query(&context, native_query).await.unwrap(),
            Some(Bytes::from_static(b"{ hero(func: uid(0x1)) { uid } }"))
        );
        assert_eq!(
            resolver.resolve(&context, &query).await.data,
            Some(Bytes::from_static(b"hero"))
        );
    }
}
