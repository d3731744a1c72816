use std::error::Error as StdError;

use displaydoc::Display;
use serde_json::Value;
use thiserror::Error;
use tower::BoxError;

use crate::context::Stage;
use crate::graphql;

/// Error types for resolution.
///
/// These are handed to the [`ResultCompleter`](crate::ResultCompleter), which decides what the
/// caller eventually sees. [`ResolveError::to_graphql_error`] renders them for a response.
#[derive(Error, Display, Debug)]
#[ignore_extra_doc_attributes]
#[non_exhaustive]
pub enum ResolveError {
    /// couldn't rewrite query {field}
    Rewrite {
        /// Response name of the field.
        field: String,
        source: BoxError,
    },

    /// {store} query failed
    Execution {
        /// The store label.
        store: String,
        /// Response name of the field.
        field: String,
        source: BoxError,
    },

    /// couldn't build HTTP request for {field}
    RequestConstruction {
        /// Response name of the field.
        field: String,
        source: BoxError,
    },

    /// HTTP request to '{url}' failed
    ///
    /// Note that this relates to a transport error and not a GraphQL error.
    Transport { url: String, source: reqwest::Error },

    /// couldn't read HTTP response body from '{url}'
    ///
    /// Whatever part of the body was received before the failure is discarded.
    ResponseBody { url: String, source: reqwest::Error },

    /// couldn't complete query result
    Completion { source: BoxError },

    /// resolution was cancelled during {stage}
    Cancelled { stage: Stage },

    /// resolution deadline exceeded during {stage}
    DeadlineExceeded { stage: Stage },
}

impl ResolveError {
    /// Wrap an error raised while completing a result.
    pub fn completion(source: impl Into<BoxError>) -> Self {
        ResolveError::Completion {
            source: source.into(),
        }
    }

    /// The code exposed in the `extensions` of the GraphQL error.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Rewrite { .. } => "REWRITE_FAILED",
            ResolveError::Execution { .. } => "EXECUTION_FAILED",
            ResolveError::RequestConstruction { .. } => "REQUEST_CONSTRUCTION_FAILED",
            ResolveError::Transport { .. } | ResolveError::ResponseBody { .. } => {
                "TRANSPORT_FAILED"
            }
            ResolveError::Completion { .. } => "COMPLETION_FAILED",
            ResolveError::Cancelled { .. } => "CANCELLED",
            ResolveError::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
        }
    }

    /// The message of this error followed by the messages of its causes.
    pub fn message_with_causes(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Convert the resolve error to a GraphQL error.
    pub fn to_graphql_error(&self, path: Option<graphql::Path>) -> graphql::Error {
        let mut extensions = graphql::Object::new();
        extensions.insert("code".to_owned(), Value::from(self.code()));
        match self {
            ResolveError::Rewrite { field, .. }
            | ResolveError::Execution { field, .. }
            | ResolveError::RequestConstruction { field, .. } => {
                extensions.insert("field".to_owned(), Value::from(field.as_str()));
            }
            ResolveError::Cancelled { stage } | ResolveError::DeadlineExceeded { stage } => {
                extensions.insert("stage".to_owned(), Value::from(stage.to_string()));
            }
            _ => {}
        }

        graphql::Error {
            message: self.message_with_causes(),
            locations: Default::default(),
            path,
            extensions,
        }
    }
}
