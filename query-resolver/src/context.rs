use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::configuration::Configuration;
use crate::error::ResolveError;

/// A step of the resolution pipeline that may have to wait.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, strum_macros::Display, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Building the native query from the field.
    Rewrite,
    /// Running the native query against the store.
    Execute,
    /// Sending the remote HTTP request.
    HttpRequest,
    /// Reading the remote HTTP response body.
    ResponseBody,
}

/// The request scoped context handed to every collaborator of a resolution.
///
/// Cloning a context is cheap and the clone shares the cancellation token of the original, so
/// cancelling any clone cancels all of them. Use [`Context::child`] to get a context which can be
/// cancelled on its own.
#[derive(Clone, Debug, Default)]
pub struct Context {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context carrying the resolution timeout of the configuration, if any.
    pub fn from_configuration(configuration: &Configuration) -> Self {
        match configuration.resolve.timeout {
            Some(timeout) => Self::new().with_timeout(timeout),
            None => Self::new(),
        }
    }

    /// Set a deadline `timeout` from now.
    ///
    /// An earlier deadline already set on this context is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set the instant after which pending steps are abandoned.
    ///
    /// An earlier deadline already set on this context is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// A context cancelled whenever this one is, but which can also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Await `future` unless the context is cancelled or its deadline passes first.
    ///
    /// Cancellation wins over a future which is ready at the same time.
    pub(crate) async fn run<F>(&self, stage: Stage, future: F) -> Result<F::Output, ResolveError>
    where
        F: Future,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => futures::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ResolveError::Cancelled { stage }),
            _ = deadline => Err(ResolveError::DeadlineExceeded { stage }),
            output = future => Ok(output),
        }
    }
}
