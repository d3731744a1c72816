use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::Instrument;
use tracing::Span;

use crate::configuration::Configuration;
use crate::configuration::DEFAULT_STORE_NAME;
use crate::context::Context;
use crate::context::Stage;
use crate::error::ResolveError;
use crate::query::Query;
use crate::resolve::Resolved;
use crate::trace::RESOLVE_QUERY_SPAN_NAME;
use crate::trace::SpanTimer;
use crate::traits::QueryExecutor;
use crate::traits::QueryResolver;
use crate::traits::QueryRewriter;
use crate::traits::ResultCompleter;

/// Resolves a field from the graph store.
///
/// The resolver runs the pipeline:
/// 1. rewrite the query field into a native query,
/// 2. execute the native query, unless rewriting failed,
/// 3. complete the raw result, or the error of the previous steps.
pub struct StoreQueryResolver<Q> {
    rewriter: Arc<dyn QueryRewriter<Q>>,
    executor: Arc<dyn QueryExecutor<Q>>,
    completer: Arc<dyn ResultCompleter>,
    store_name: String,
}

impl<Q> StoreQueryResolver<Q>
where
    Q: Send + 'static,
{
    pub fn new(
        rewriter: impl QueryRewriter<Q> + 'static,
        executor: impl QueryExecutor<Q> + 'static,
        completer: impl ResultCompleter + 'static,
    ) -> Self {
        Self {
            rewriter: Arc::new(rewriter),
            executor: Arc::new(executor),
            completer: Arc::new(completer),
            store_name: DEFAULT_STORE_NAME.to_owned(),
        }
    }

    /// Label execution errors with the store name of the configuration.
    pub fn with_configuration(self, configuration: &Configuration) -> Self {
        self.with_store_name(configuration.store.name.clone())
    }

    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    async fn rewrite_and_execute(
        &self,
        context: &Context,
        query: &dyn Query,
    ) -> Result<Option<Bytes>, ResolveError> {
        let native_query = context
            .run(Stage::Rewrite, self.rewriter.rewrite(context, query))
            .await?
            .map_err(|source| ResolveError::Rewrite {
                field: query.response_name().to_owned(),
                source,
            })?;

        context
            .run(Stage::Execute, self.executor.query(context, native_query))
            .await?
            .map_err(|source| {
                tracing::info!(
                    store = %self.store_name,
                    "graphql.field.name" = %query.response_name(),
                    "{} query execution failed: {}", self.store_name, source
                );
                ResolveError::Execution {
                    store: self.store_name.clone(),
                    field: query.response_name().to_owned(),
                    source,
                }
            })
    }
}

impl<Q> Clone for StoreQueryResolver<Q> {
    fn clone(&self) -> Self {
        Self {
            rewriter: self.rewriter.clone(),
            executor: self.executor.clone(),
            completer: self.completer.clone(),
            store_name: self.store_name.clone(),
        }
    }
}

#[async_trait]
impl<Q> QueryResolver for StoreQueryResolver<Q>
where
    Q: Send + 'static,
{
    async fn resolve(&self, context: &Context, query: &dyn Query) -> Resolved {
        let span = tracing::info_span!(
            RESOLVE_QUERY_SPAN_NAME,
            "otel.kind" = "INTERNAL",
            "graphql.field.name" = %query.response_name(),
            "resolve.duration_seconds" = tracing::field::Empty,
        );

        async {
            let _timer = SpanTimer::start(Span::current());
            let result = self.rewrite_and_execute(context, query).await;
            self.completer.complete(context, query, result).await
        }
        .instrument(span)
        .await
    }
}
