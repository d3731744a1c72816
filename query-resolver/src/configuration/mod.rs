//! Logic for loading configuration in to an object model
use std::time::Duration;

use displaydoc::Display;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub(crate) const DEFAULT_STORE_NAME: &str = "store";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_HTTP_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not parse configuration: {0}
    InvalidConfiguration(#[from] serde_yaml::Error),

    /// could not build HTTP client: {0}
    HttpClient(#[from] reqwest::Error),
}

/// The configuration of the resolvers.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// The graph store configuration.
    pub store: Store,

    /// Resolution configuration.
    pub resolve: Resolve,

    /// The HTTP client used by remote resolvers.
    pub http: HttpClient,
}

impl Configuration {
    /// Parse a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The JSON schema of the configuration.
    pub fn generate_schema() -> RootSchema {
        schemars::schema_for!(Configuration)
    }

    /// Build the HTTP client of remote resolvers.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigurationError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.http.timeout)
            .connect_timeout(self.http.connect_timeout)
            .pool_idle_timeout(self.http.pool_idle_timeout);
        if let Some(user_agent) = &self.http.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(builder.build()?)
    }
}

/// Graph store configuration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Store {
    /// Name of the store, used to label query execution errors.
    /// Defaults to "store".
    pub name: String,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_owned(),
        }
    }
}

/// Resolution configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Resolve {
    /// Maximum duration of the resolution of a field, in human-readable format.
    /// No limit by default.
    #[serde(with = "humantime_serde")]
    #[schemars(with = "Option<String>")]
    pub timeout: Option<Duration>,
}

/// HTTP client configuration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct HttpClient {
    /// Request timeout in human-readable format; defaults to 30s
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// Connection timeout in human-readable format; defaults to 10s
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub connect_timeout: Duration,

    /// How long idle connections are kept in the pool; defaults to 90s
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub pool_idle_timeout: Duration,

    /// Value of the `User-Agent` header of requests.
    pub user_agent: Option<String>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            connect_timeout: DEFAULT_HTTP_CONNECT_TIMEOUT,
            pool_idle_timeout: DEFAULT_HTTP_POOL_IDLE_TIMEOUT,
            user_agent: None,
        }
    }
}

#[buildstructor::buildstructor]
impl HttpClient {
    #[builder(visibility = "pub")]
    fn new(
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
        pool_idle_timeout: Option<Duration>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            timeout: timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
            connect_timeout: connect_timeout.unwrap_or(DEFAULT_HTTP_CONNECT_TIMEOUT),
            pool_idle_timeout: pool_idle_timeout.unwrap_or(DEFAULT_HTTP_POOL_IDLE_TIMEOUT),
            user_agent,
        }
    }
}
