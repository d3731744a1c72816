//! Resolution of a single GraphQL query field.
//!
//! A [`QueryResolver`] turns one selected field into a byte-encoded result. Store backed fields
//! go through [`StoreQueryResolver`], which rewrites the field into the store's native query,
//! executes it and completes the raw result. Fields backed by a remote HTTP source go through
//! [`RemoteQueryResolver`]. Either way the [`ResultCompleter`] is always called and a
//! [`Resolved`] is always returned.

mod adapters;
pub mod configuration;
mod context;
mod error;
pub mod graphql;
mod query;
mod resolve;
mod trace;
mod traits;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::*;
pub use configuration::Configuration;
pub use context::*;
pub use error::*;
pub use query::*;
pub use resolve::*;
pub use trace::RESOLVE_HTTP_QUERY_SPAN_NAME;
pub use trace::RESOLVE_QUERY_SPAN_NAME;
pub use traits::*;

pub mod prelude {
    // NOTE: only traits can be added here!
    pub use crate::query::Introspector;
    pub use crate::query::Query;
    pub use crate::traits::*;
}

pub mod reexports {
    pub use bytes;
    pub use futures;
    pub use reqwest;
    pub use tower::BoxError;
}
