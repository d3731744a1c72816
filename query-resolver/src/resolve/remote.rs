use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tower::BoxError;
use tracing::Instrument;
use tracing::Span;

use crate::configuration::Configuration;
use crate::configuration::ConfigurationError;
use crate::context::Context;
use crate::context::Stage;
use crate::error::ResolveError;
use crate::query::HttpResolverConfig;
use crate::query::Query;
use crate::resolve::Resolved;
use crate::trace::RESOLVE_HTTP_QUERY_SPAN_NAME;
use crate::trace::SpanTimer;
use crate::traits::QueryExecutor;
use crate::traits::QueryResolver;
use crate::traits::QueryRewriter;
use crate::traits::ResultCompleter;

/// Resolves a field from a remote HTTP endpoint.
///
/// The request is described by the field itself through [`Query::http_resolver`]. The whole
/// response body is handed to the completer, whatever the response status.
pub struct RemoteQueryResolver<Q> {
    http_client: reqwest::Client,
    rewriter: Arc<dyn QueryRewriter<Q>>,
    executor: Arc<dyn QueryExecutor<Q>>,
    completer: Arc<dyn ResultCompleter>,
}

impl<Q> RemoteQueryResolver<Q>
where
    Q: Send + 'static,
{
    pub fn new(
        http_client: reqwest::Client,
        rewriter: impl QueryRewriter<Q> + 'static,
        executor: impl QueryExecutor<Q> + 'static,
        completer: impl ResultCompleter + 'static,
    ) -> Self {
        Self {
            http_client,
            rewriter: Arc::new(rewriter),
            executor: Arc::new(executor),
            completer: Arc::new(completer),
        }
    }

    /// Create a resolver using an HTTP client built from the configuration.
    pub fn from_configuration(
        configuration: &Configuration,
        rewriter: impl QueryRewriter<Q> + 'static,
        executor: impl QueryExecutor<Q> + 'static,
        completer: impl ResultCompleter + 'static,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            configuration.http_client()?,
            rewriter,
            executor,
            completer,
        ))
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn rewriter(&self) -> &Arc<dyn QueryRewriter<Q>> {
        &self.rewriter
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor<Q>> {
        &self.executor
    }

    async fn fetch(
        &self,
        context: &Context,
        query: &dyn Query,
    ) -> Result<Option<Bytes>, ResolveError> {
        let request = query
            .http_resolver()
            .and_then(|config| self.build_request(config))
            .map_err(|source| ResolveError::RequestConstruction {
                field: query.response_name().to_owned(),
                source,
            })?;

        let url = request.url().to_string();
        tracing::debug!(
            "http.method" = %request.method(),
            "http.url" = %url,
            "sending request for field {}", query.response_name()
        );

        let response = context
            .run(Stage::HttpRequest, self.http_client.execute(request))
            .await?
            .map_err(|source| ResolveError::Transport {
                url: url.clone(),
                source,
            })?;
        tracing::debug!("http.response.status_code" = response.status().as_u16(), "http.url" = %url);

        // Reading the body consumes the response, which releases the connection on every path.
        let body = context
            .run(Stage::ResponseBody, response.bytes())
            .await?
            .map_err(|source| ResolveError::ResponseBody { url, source })?;

        Ok(Some(body))
    }

    fn build_request(&self, config: HttpResolverConfig) -> Result<reqwest::Request, BoxError> {
        let method = if config.method.is_empty() {
            http::Method::GET
        } else {
            http::Method::from_bytes(config.method.as_bytes())?
        };
        let url = url::Url::parse(&config.url)?;

        let mut request = self
            .http_client
            .request(method, url)
            .headers(config.headers);
        if let Some(body) = config.body {
            request = request.body(body);
        }
        Ok(request.build()?)
    }
}

impl<Q> Clone for RemoteQueryResolver<Q> {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            rewriter: self.rewriter.clone(),
            executor: self.executor.clone(),
            completer: self.completer.clone(),
        }
    }
}

#[async_trait]
impl<Q> QueryResolver for RemoteQueryResolver<Q>
where
    Q: Send + 'static,
{
    async fn resolve(&self, context: &Context, query: &dyn Query) -> Resolved {
        let span = tracing::info_span!(
            RESOLVE_HTTP_QUERY_SPAN_NAME,
            "otel.kind" = "CLIENT",
            "graphql.field.name" = %query.response_name(),
            "resolve.duration_seconds" = tracing::field::Empty,
        );

        async {
            let _timer = SpanTimer::start(Span::current());
            let result = self.fetch(context, query).await;
            self.completer.complete(context, query, result).await
        }
        .instrument(span)
        .await
    }
}
