use url::Url;

/// Default API version segment
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default API host
pub const DEFAULT_API_HOST: &str = "app.datadoghq.com";

/// Connection settings shared by every endpoint bound to a client
///
/// `api_host` is normally a bare host name and requests go out over HTTPS.
/// A host that already carries a scheme (`http://127.0.0.1:8126`) is used
/// as-is, which is handy for local agents and test servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    pub api_version: String,
    pub api_host: String,
    /// Optional HTTPS proxy applied to every request
    pub proxy: Option<Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            app_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from defaults overlaid with `update`
    pub fn new(update: ConfigUpdate) -> Self {
        let mut config = Self::default();
        config.apply(update);
        config
    }

    /// Merge the supplied fields over the current values
    ///
    /// Fields left unset in `update` keep whatever they held before.
    /// Returns `true` when the proxy changed.
    pub fn apply(&mut self, update: ConfigUpdate) -> bool {
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(app_key) = update.app_key {
            self.app_key = Some(app_key);
        }
        if let Some(api_version) = update.api_version {
            self.api_version = api_version;
        }
        if let Some(api_host) = update.api_host {
            self.api_host = api_host;
        }
        match update.proxy {
            Some(proxy) if self.proxy != proxy => {
                self.proxy = proxy;
                true
            }
            _ => false,
        }
    }

    /// Base URL every request path is appended to, e.g.
    /// `https://app.datadoghq.com/api/v1`
    pub fn base_url(&self) -> String {
        let host = self.api_host.trim_end_matches('/');
        if host.contains("://") {
            format!("{host}/api/{}", self.api_version)
        } else {
            format!("https://{host}/api/{}", self.api_version)
        }
    }
}

/// Partial configuration used for construction and re-configuration
///
/// # Example
///
/// ```rust
/// use dogapi::ConfigUpdate;
///
/// let update = ConfigUpdate::new()
///     .with_api_key("api_key")
///     .with_app_key("app_key");
/// assert_eq!(update.api_key.as_deref(), Some("api_key"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    pub api_version: Option<String>,
    pub api_host: Option<String>,
    /// `Some(None)` clears a previously set proxy
    pub proxy: Option<Option<Url>>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(Some(proxy));
        self
    }

    /// Go back to direct connections
    pub fn without_proxy(mut self) -> Self {
        self.proxy = Some(None);
        self
    }
}
