use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ClientConfig, ConfigUpdate};
use crate::errors::{DatadogError, Result};
use crate::request::{Body, Call, Callback, RequestDescriptor};

/// Timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query keys that always come from the configuration
const AUTH_KEYS: [&str; 2] = ["api_key", "application_key"];

struct Shared {
    config: RwLock<ClientConfig>,
    http: RwLock<ClientWithMiddleware>,
    injected: bool,
}

/// Issues one HTTP request per normalized descriptor
///
/// Clones share one configuration: every endpoint built from a client sees
/// later [`RequestClient::configure`] calls.
///
/// # Example
///
/// ```rust,no_run
/// use dogapi::{ClientConfig, ConfigUpdate, RequestClient, RequestDescriptor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RequestClient::new(ClientConfig::new(
///         ConfigUpdate::new().with_api_key("api_key").with_app_key("app_key"),
///     ))?;
///
///     let tags = client.request(&RequestDescriptor::get("/tags/hosts")).await?;
///     println!("{tags}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RequestClient {
    shared: Arc<Shared>,
}

impl RequestClient {
    /// Create a new request client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. an
    /// unusable proxy URL).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = build_http(config.proxy.as_ref())?;
        Ok(Self::from_parts(config, http, false))
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (logging, tracing, ...).
    /// The proxy setting is left to the supplied client.
    pub fn with_client(client: ClientWithMiddleware, config: ClientConfig) -> Self {
        Self::from_parts(config, client, true)
    }

    fn from_parts(config: ClientConfig, http: ClientWithMiddleware, injected: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                config: RwLock::new(config),
                http: RwLock::new(http),
                injected,
            }),
        }
    }

    /// Merge `update` into the shared configuration
    ///
    /// The configuration stays write-locked until the update and any
    /// transport rebuild are done, so concurrent calls apply one after the
    /// other. Lock order is config, then http.
    ///
    /// # Errors
    ///
    /// Returns an error if a new proxy is given and the HTTP client cannot
    /// be rebuilt with it; the configuration is left untouched in that case.
    pub fn configure(&self, update: ConfigUpdate) -> Result<()> {
        let mut config = self
            .shared
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = config.clone();
        let proxy_changed = next.apply(update);

        if proxy_changed {
            if self.shared.injected {
                warn!("Ignoring proxy change for an injected HTTP client");
            } else {
                let http = build_http(next.proxy.as_ref())?;
                *self
                    .shared
                    .http
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = http;
            }
        }

        *config = next;
        debug!(proxy_changed, "Client configuration updated");
        Ok(())
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> ClientConfig {
        self.shared
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn call(&self, descriptor: RequestDescriptor, callback: Option<Callback>) -> Call {
        Call::new(self.clone(), descriptor, callback)
    }

    /// Perform exactly one HTTP request
    ///
    /// The response body is parsed as JSON; an empty body yields
    /// `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL cannot be built from the configuration
    /// - The HTTP request fails or times out
    /// - Datadog returns a non-success status code
    /// - The response body is not JSON
    #[instrument(
        name = "RequestClient::request",
        skip_all,
        fields(method = %descriptor.method, path = %descriptor.path)
    )]
    pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<Value> {
        let url = {
            let config = self
                .shared
                .config
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            build_url(&config, descriptor)?
        };
        let http = self
            .shared
            .http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        debug!("Sending request to Datadog");

        let mut builder = http.request(descriptor.method.into(), url);
        if let Some(content_type) = descriptor.effective_content_type() {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder = match &descriptor.body {
            Body::None => builder,
            Body::Empty => builder.body(""),
            Body::Json(value) => {
                builder.body(serde_json::to_string(value).map_err(DatadogError::Serialize)?)
            }
            Body::Raw(raw) => builder.body(raw.clone()),
        };

        let response = builder.send().await.map_err(DatadogError::Request)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| DatadogError::Request(err.into()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Datadog returned an error");
            return Err(DatadogError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!(status = status.as_u16(), "Request completed");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| DatadogError::Decode(err.to_string()))
    }
}

fn build_http(proxy: Option<&Url>) -> Result<ClientWithMiddleware> {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
    if let Some(proxy) = proxy {
        let proxy = reqwest::Proxy::all(proxy.clone()).map_err(DatadogError::BuildHttpClient)?;
        builder = builder.proxy(proxy);
    }
    let client = builder.build().map_err(DatadogError::BuildHttpClient)?;
    Ok(ClientBuilder::new(client).build())
}

/// Final URL for a descriptor: `{base}{path}?{query}&api_key=..&application_key=..`
///
/// Caller supplied query values never replace the credentials.
fn build_url(config: &ClientConfig, descriptor: &RequestDescriptor) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", config.base_url(), descriptor.path))
        .map_err(DatadogError::InvalidUrl)?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in descriptor.query.iter() {
            if !AUTH_KEYS.contains(&key) {
                pairs.append_pair(key, value);
            }
        }
        if let Some(api_key) = &config.api_key {
            pairs.append_pair("api_key", api_key);
        }
        if let Some(app_key) = &config.app_key {
            pairs.append_pair("application_key", app_key);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}
