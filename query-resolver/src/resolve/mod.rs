use bytes::Bytes;

use crate::error::ResolveError;

mod remote;
mod store;

pub use remote::RemoteQueryResolver;
pub use store::StoreQueryResolver;

/// The outcome of resolving one query field.
///
/// `data` may be set alongside `error`: a field can resolve to a partial result.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Resolved {
    /// The completed payload.
    pub data: Option<Bytes>,
    pub error: Option<ResolveError>,
}

impl Resolved {
    pub fn new(data: Option<Bytes>, error: Option<ResolveError>) -> Self {
        Self { data, error }
    }

    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self::new(Some(data.into()), None)
    }

    pub fn from_error(error: ResolveError) -> Self {
        Self::new(None, Some(error))
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the partial data of a failed resolution.
    pub fn into_result(self) -> Result<Option<Bytes>, ResolveError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl From<Result<Option<Bytes>, ResolveError>> for Resolved {
    fn from(result: Result<Option<Bytes>, ResolveError>) -> Self {
        match result {
            Ok(data) => Self::new(data, None),
            Err(error) => Self::from_error(error),
        }
    }
}
