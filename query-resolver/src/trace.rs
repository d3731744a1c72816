use tokio::time::Instant;
use tracing::Span;

pub const RESOLVE_QUERY_SPAN_NAME: &str = "resolve_query";
pub const RESOLVE_HTTP_QUERY_SPAN_NAME: &str = "resolve_http_query";

/// Field of the resolution spans holding their duration in seconds.
pub(crate) const DURATION_FIELD: &str = "resolve.duration_seconds";

/// Records the time elapsed since its creation on a span when dropped.
///
/// The span field must have been declared empty when the span was created.
pub(crate) struct SpanTimer {
    span: Span,
    start: Instant,
}

impl SpanTimer {
    pub(crate) fn start(span: Span) -> Self {
        Self {
            span,
            start: Instant::now(),
        }
    }
}

impl Drop for SpanTimer {
    fn drop(&mut self) {
        self.span
            .record(DURATION_FIELD, self.start.elapsed().as_secs_f64());
    }
}
