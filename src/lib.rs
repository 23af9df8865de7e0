//! # dogapi
//!
//! A Rust client library for the [Datadog](https://docs.datadoghq.com/api/) HTTP API.
//!
//! ## Features
//!
//! - One endpoint object per API resource (monitors, metrics, events, ...)
//! - Optional fields are only sent when supplied
//! - Every call can be awaited, or completed through a callback
//! - One shared configuration: re-configuring is seen by every endpoint
//! - A command-line front-end (`dogapi <resource> <subcommand>`) built on clap
//!
//! ## Example
//!
//! ```rust,no_run
//! use dogapi::{ConfigUpdate, Dogapi, MonitorMuteOptions, OptionalArg};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dogapi = Dogapi::new(
//!         ConfigUpdate::new()
//!             .with_api_key("api_key")
//!             .with_app_key("app_key"),
//!     )?;
//!
//!     dogapi
//!         .metric
//!         .send("my.metric", 500.0, OptionalArg::Omitted)
//!         .await?;
//!
//!     let mute = MonitorMuteOptions {
//!         scope: Some("role:db".to_string()),
//!         end: None,
//!     };
//!     dogapi.monitor.mute(1234, mute).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
mod client;
mod config;
mod constants;
mod errors;
mod normalize;
mod request;

use reqwest_middleware::ClientWithMiddleware;
use std::sync::OnceLock;

pub use api::{
    Comment, CommentProperties, Downtime, DowntimeProperties, Embed, EmbedGetOptions,
    EmbedOptions, Event, EventProperties, EventQueryOptions, Graph, Host, HostMuteOptions,
    Infrastructure, Metric, Monitor, MonitorListOptions, MonitorMuteOptions, MonitorProperties,
    Screenboard, ScreenboardOptions, Search, Series, SeriesOptions, ServiceCheck,
    ServiceCheckOptions, Tag, TagOptions, TemplateVariable, Timeboard, User,
};
pub use cli::{parse_args, CliCommand};
pub use client::{RequestClient, REQUEST_TIMEOUT};
pub use config::{ClientConfig, ConfigUpdate, DEFAULT_API_HOST, DEFAULT_API_VERSION};
pub use constants::{Status, CRITICAL, OK, UNKNOWN, WARNING};
pub use errors::{DatadogError, Result};
pub use normalize::{now, Point, PointValue, PointsInput, QueryParams};
pub use request::{
    callback, resolve_optional_args, Body, Call, Callback, HttpMethod, OptionalArg,
    RequestDescriptor, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON,
};

/// Every resource endpoint, bound to one shared client
#[derive(Clone)]
pub struct Dogapi {
    pub comment: Comment,
    pub downtime: Downtime,
    pub embed: Embed,
    pub event: Event,
    pub graph: Graph,
    pub host: Host,
    pub infrastructure: Infrastructure,
    pub metric: Metric,
    pub monitor: Monitor,
    pub screenboard: Screenboard,
    pub search: Search,
    pub service_check: ServiceCheck,
    pub tag: Tag,
    pub timeboard: Timeboard,
    pub user: User,
    client: RequestClient,
}

impl Dogapi {
    /// Create a new set of endpoints over a fresh HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(update: ConfigUpdate) -> Result<Self> {
        let client = RequestClient::new(ClientConfig::new(update))?;
        Ok(Self::from_client(client))
    }

    /// Create a new set of endpoints with a custom reqwest middleware client
    pub fn with_client(http: ClientWithMiddleware, update: ConfigUpdate) -> Self {
        Self::from_client(RequestClient::with_client(http, ClientConfig::new(update)))
    }

    pub fn from_client(client: RequestClient) -> Self {
        Self {
            comment: Comment::new(client.clone()),
            downtime: Downtime::new(client.clone()),
            embed: Embed::new(client.clone()),
            event: Event::new(client.clone()),
            graph: Graph::new(client.clone()),
            host: Host::new(client.clone()),
            infrastructure: Infrastructure::new(client.clone()),
            metric: Metric::new(client.clone()),
            monitor: Monitor::new(client.clone()),
            screenboard: Screenboard::new(client.clone()),
            search: Search::new(client.clone()),
            service_check: ServiceCheck::new(client.clone()),
            tag: Tag::new(client.clone()),
            timeboard: Timeboard::new(client.clone()),
            user: User::new(client.clone()),
            client,
        }
    }

    /// Merge `update` into the configuration all endpoints share
    ///
    /// # Errors
    ///
    /// Returns an error if a new proxy cannot be applied.
    pub fn configure(&self, update: ConfigUpdate) -> Result<()> {
        self.client.configure(update)
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }
}

static DEFAULT: OnceLock<Dogapi> = OnceLock::new();

/// The process-wide endpoints, created with the default configuration on
/// first use
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built on first use.
pub fn default_client() -> Result<&'static Dogapi> {
    if let Some(dogapi) = DEFAULT.get() {
        return Ok(dogapi);
    }
    let dogapi = Dogapi::new(ConfigUpdate::new())?;
    Ok(DEFAULT.get_or_init(|| dogapi))
}

/// Configure the process-wide endpoints
///
/// Endpoints fetched from [`default_client`] before this call pick up the
/// new settings too.
///
/// # Errors
///
/// Returns an error if the default client cannot be built or the update
/// cannot be applied.
pub fn initialize(update: ConfigUpdate) -> Result<()> {
    default_client()?.configure(update)
}
