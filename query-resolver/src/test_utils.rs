use std::sync::Arc;
use std::sync::Mutex;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use tower::BoxError;
use tracing::Id;
use tracing::Subscriber;
use tracing::field::Field;
use tracing::field::Visit;
use tracing::span::Attributes;
use tracing::span::Record;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context as LayerContext;
use tracing_subscriber::registry::LookupSpan;

use crate::adapters::ResultCompletionFn;
use crate::context::Context;
use crate::error::ResolveError;
use crate::query::HttpResolverConfig;
use crate::query::Query;
use crate::resolve::Resolved;
use crate::traits::ResultCompleter;

#[derive(Debug, Default)]
pub(crate) struct TestQuery {
    name: String,
    alias: Option<String>,
    http: Option<HttpResolverConfig>,
}

impl TestQuery {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    pub(crate) fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_owned());
        self
    }

    pub(crate) fn with_http(mut self, http: HttpResolverConfig) -> Self {
        self.http = Some(http);
        self
    }
}

impl Query for TestQuery {
    fn name(&self) -> &str {
        &self.name
    }

    fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn http_resolver(&self) -> Result<HttpResolverConfig, BoxError> {
        self.http
            .clone()
            .ok_or_else(|| format!("field '{}' has no HTTP resolver", self.name).into())
    }
}

/// What a [`RecordingCompleter`] was called with.
#[derive(Debug)]
pub(crate) enum Completed {
    Data(Option<Bytes>),
    Error(String),
}

/// Completes results unchanged, keeping track of its inputs.
#[derive(Clone, Default)]
pub(crate) struct RecordingCompleter {
    calls: Arc<Mutex<Vec<Completed>>>,
}

impl RecordingCompleter {
    pub(crate) fn calls(&self) -> Vec<Completed> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait::async_trait]
impl ResultCompleter for RecordingCompleter {
    async fn complete(
        &self,
        _context: &Context,
        _query: &dyn Query,
        result: Result<Option<Bytes>, ResolveError>,
    ) -> Resolved {
        self.calls.lock().unwrap().push(match &result {
            Ok(data) => Completed::Data(data.clone()),
            Err(error) => Completed::Error(error.message_with_causes()),
        });
        result.into()
    }
}

/// A completer which returns its input as is.
pub(crate) fn echo_completer() -> impl ResultCompleter {
    ResultCompletionFn::new(
        |_: &Context, _: &dyn Query, result: Result<Option<Bytes>, ResolveError>| {
            async move { Resolved::from(result) }.boxed()
        },
    )
}

pub(crate) fn boxed<'a, T: Send + 'a>(value: T) -> BoxFuture<'a, T> {
    futures::future::ready(value).boxed()
}

/// A span seen by a [`SpanRecorder`].
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordedSpan {
    pub(crate) name: &'static str,
    pub(crate) fields: Vec<(String, String)>,
    pub(crate) closed: bool,
}

impl RecordedSpan {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Keeps track of the spans created while it is the subscriber.
#[derive(Clone, Default)]
pub(crate) struct SpanRecorder {
    spans: Arc<Mutex<Vec<(Id, RecordedSpan)>>>,
}

impl SpanRecorder {
    pub(crate) fn spans(&self) -> Vec<RecordedSpan> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .map(|(_, span)| span.clone())
            .collect()
    }
}

struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_owned(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_owned(), value.to_owned()));
    }
}

impl<S> Layer<S> for SpanRecorder
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: LayerContext<'_, S>) {
        let mut span = RecordedSpan {
            name: attrs.metadata().name(),
            ..Default::default()
        };
        attrs.record(&mut FieldVisitor(&mut span.fields));
        self.spans.lock().unwrap().push((id.clone(), span));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: LayerContext<'_, S>) {
        let mut spans = self.spans.lock().unwrap();
        if let Some((_, span)) = spans.iter_mut().rev().find(|(span_id, _)| span_id == id) {
            values.record(&mut FieldVisitor(&mut span.fields));
        }
    }

    fn on_close(&self, id: Id, _ctx: LayerContext<'_, S>) {
        let mut spans = self.spans.lock().unwrap();
        if let Some((_, span)) = spans.iter_mut().rev().find(|(span_id, _)| *span_id == id) {
            span.closed = true;
        }
    }
}
