use std::fmt::Debug;

use bytes::Bytes;
use http::HeaderMap;
use tower::BoxError;

/// One selected field of an incoming GraphQL operation.
///
/// Resolvers only read from it.
pub trait Query: Send + Sync + Debug {
    /// The name of the field in the schema.
    fn name(&self) -> &str;

    /// The name of the field in the response: its alias if it has one, its name otherwise.
    fn response_name(&self) -> &str {
        self.name()
    }

    /// Describe the HTTP request resolving this field.
    ///
    /// Only fields backed by a remote HTTP source have one.
    fn http_resolver(&self) -> Result<HttpResolverConfig, BoxError> {
        Err(format!("field '{}' has no HTTP resolver", self.name()).into())
    }
}

/// The description of the HTTP request resolving a remote field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpResolverConfig {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
    /// Headers forwarded with the request.
    pub headers: HeaderMap,
}

#[buildstructor::buildstructor]
impl HttpResolverConfig {
    #[builder(visibility = "pub")]
    fn new(
        method: Option<String>,
        url: String,
        body: Option<String>,
        headers: Option<HeaderMap>,
    ) -> Self {
        Self {
            method: method.unwrap_or_else(|| http::Method::GET.to_string()),
            url,
            body,
            headers: headers.unwrap_or_default(),
        }
    }
}

/// Answers a field from static schema knowledge instead of the store.
pub trait Introspector: Send + Sync {
    fn introspect(&self, query: &dyn Query) -> Result<Bytes, BoxError>;
}

impl<F> Introspector for F
where
    F: Fn(&dyn Query) -> Result<Bytes, BoxError> + Send + Sync,
{
    fn introspect(&self, query: &dyn Query) -> Result<Bytes, BoxError> {
        (self)(query)
    }
}
