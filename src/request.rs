use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use tokio::task::JoinHandle;

use crate::client::RequestClient;
use crate::errors::{DatadogError, Result};
use crate::normalize::{JsonBody, QueryParams};

/// Content type used for JSON bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type used for form encoded bodies
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// HTTP methods the API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Whether requests with this method carry a `Content-Type` header
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No body at all
    #[default]
    None,
    /// An explicitly empty body
    Empty,
    /// A JSON document, serialized when the request is sent
    Json(Value),
    /// A pre-serialized body (e.g. form data) sent verbatim
    Raw(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Body::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

/// A fully normalized API call, ready for the request client
///
/// `path` is relative to `/api/{version}` and already has any resource id
/// interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub body: Body,
    pub content_type: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: Body::None,
            content_type: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: impl Into<Value>) -> Self {
        self.body = Body::Json(body.into());
        self
    }

    pub fn with_empty_body(mut self) -> Self {
        self.body = Body::Empty;
        self
    }

    /// JSON body with the supplied fields, or an empty body when there are none
    pub fn with_fields(self, body: JsonBody) -> Self {
        if body.is_empty() {
            self.with_empty_body()
        } else {
            self.with_json(body)
        }
    }

    /// Attach a pre-serialized body along with its content type
    pub fn with_raw(mut self, body: impl Into<String>, content_type: &str) -> Self {
        self.body = Body::Raw(body.into());
        self.content_type = Some(content_type.to_string());
        self
    }

    /// `Content-Type` header for this request, if it carries one
    pub fn effective_content_type(&self) -> Option<&str> {
        if !self.method.has_body() {
            return None;
        }
        Some(self.content_type.as_deref().unwrap_or(CONTENT_TYPE_JSON))
    }
}

/// Completion handler, invoked once with the outcome of a call
pub type Callback = Box<dyn FnOnce(std::result::Result<&Value, &DatadogError>) + Send + 'static>;

/// Box a closure as a [`Callback`]
pub fn callback<F>(f: F) -> Callback
where
    F: FnOnce(std::result::Result<&Value, &DatadogError>) + Send + 'static,
{
    Box::new(f)
}

/// The optional argument slot of an operation
///
/// Callers fill it with options, leave it out, or put a completion
/// callback there directly. [`resolve_optional_args`] sorts the three apart.
pub enum OptionalArg<O> {
    Omitted,
    Options(O),
    Callback(Callback),
}

impl<O> OptionalArg<O> {
    /// Put a completion callback in the options position
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(std::result::Result<&Value, &DatadogError>) + Send + 'static,
    {
        OptionalArg::Callback(Box::new(f))
    }

    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> OptionalArg<P> {
        match self {
            OptionalArg::Omitted => OptionalArg::Omitted,
            OptionalArg::Options(options) => OptionalArg::Options(f(options)),
            OptionalArg::Callback(cb) => OptionalArg::Callback(cb),
        }
    }
}

impl<O> Default for OptionalArg<O> {
    fn default() -> Self {
        OptionalArg::Omitted
    }
}

impl<O> From<O> for OptionalArg<O> {
    fn from(options: O) -> Self {
        OptionalArg::Options(options)
    }
}

impl From<&str> for OptionalArg<String> {
    fn from(value: &str) -> Self {
        OptionalArg::Options(value.to_string())
    }
}

impl From<Vec<&str>> for OptionalArg<Vec<String>> {
    fn from(values: Vec<&str>) -> Self {
        OptionalArg::Options(values.into_iter().map(str::to_string).collect())
    }
}

impl<O: std::fmt::Debug> std::fmt::Debug for OptionalArg<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionalArg::Omitted => write!(f, "Omitted"),
            OptionalArg::Options(options) => f.debug_tuple("Options").field(options).finish(),
            OptionalArg::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

/// Split an optional argument slot into options and a callback
///
/// A callback found where options were expected is shifted into the
/// callback position and the options fall back to `fallback`.
pub fn resolve_optional_args<O>(candidate: OptionalArg<O>, fallback: O) -> (O, Option<Callback>) {
    match candidate {
        OptionalArg::Omitted => (fallback, None),
        OptionalArg::Options(options) => (options, None),
        OptionalArg::Callback(cb) => (fallback, Some(cb)),
    }
}

/// A pending API call
///
/// Await it to get the response, or attach a callback with
/// [`Call::on_complete`] (or pass one in the options slot). When a callback
/// is present it sees the outcome exactly once, and the awaited result is
/// the same outcome.
///
/// # Example
///
/// ```rust,no_run
/// use dogapi::{Dogapi, ConfigUpdate, OptionalArg};
///
/// # async fn run() -> dogapi::Result<()> {
/// let dogapi = Dogapi::new(ConfigUpdate::new().with_api_key("k").with_app_key("a"))?;
///
/// // awaitable
/// let monitors = dogapi.monitor.get_all(OptionalArg::Omitted).await?;
///
/// // callback in the options position
/// dogapi
///     .monitor
///     .mute(1234, OptionalArg::callback(|res| println!("{res:?}")))
///     .spawn();
/// # Ok(())
/// # }
/// ```
#[must_use = "a call does nothing until it is awaited or spawned"]
pub struct Call {
    client: RequestClient,
    descriptor: RequestDescriptor,
    callback: Option<Callback>,
}

impl Call {
    pub(crate) fn new(
        client: RequestClient,
        descriptor: RequestDescriptor,
        callback: Option<Callback>,
    ) -> Self {
        Self {
            client,
            descriptor,
            callback,
        }
    }

    /// Attach a completion callback, replacing any shifted one
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(std::result::Result<&Value, &DatadogError>) + Send + 'static,
    {
        self.callback = Some(Box::new(f));
        self
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn into_descriptor(self) -> RequestDescriptor {
        self.descriptor
    }

    /// Perform the request and settle the callback, if any
    pub async fn send(self) -> Result<Value> {
        let Call {
            client,
            descriptor,
            callback,
        } = self;
        let result = client.request(&descriptor).await;
        if let Some(cb) = callback {
            cb(result.as_ref());
        }
        result
    }

    /// Run the call on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime, like `tokio::spawn`.
    pub fn spawn(self) -> JoinHandle<Result<Value>> {
        tokio::spawn(self.send())
    }
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("descriptor", &self.descriptor)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl IntoFuture for Call {
    type Output = Result<Value>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        scope: Option<String>,
    }

    #[test]
    fn test_resolve_omitted_uses_fallback() {
        let (options, cb) = resolve_optional_args(OptionalArg::Omitted, Opts::default());
        assert_eq!(options, Opts::default());
        assert!(cb.is_none());
    }

    #[test]
    fn test_resolve_options_passes_through() {
        let supplied = Opts {
            scope: Some("role:db".to_string()),
        };
        let (options, cb) = resolve_optional_args(
            OptionalArg::Options(supplied),
            Opts::default(),
        );
        assert_eq!(options.scope.as_deref(), Some("role:db"));
        assert!(cb.is_none());
    }

    #[test]
    fn test_resolve_shifts_callback_out_of_options_slot() {
        let (options, cb) = resolve_optional_args(
            OptionalArg::<Opts>::callback(|_| {}),
            Opts::default(),
        );
        assert_eq!(options, Opts::default());
        assert!(cb.is_some());
    }

    #[test]
    fn test_optional_arg_map_keeps_callback() {
        let arg: OptionalArg<Option<String>> = OptionalArg::<String>::callback(|_| {}).map(Some);
        assert!(matches!(arg, OptionalArg::Callback(_)));

        let arg: OptionalArg<Option<String>> = OptionalArg::from("chef").map(Some);
        assert!(matches!(arg, OptionalArg::Options(Some(ref s)) if s == "chef"));
    }

    #[test]
    fn test_content_type_only_for_post_and_put() {
        assert_eq!(
            RequestDescriptor::post("/series").effective_content_type(),
            Some(CONTENT_TYPE_JSON)
        );
        assert_eq!(
            RequestDescriptor::put("/dash/1").effective_content_type(),
            Some(CONTENT_TYPE_JSON)
        );
        assert_eq!(
            RequestDescriptor::post("/graph/embed")
                .with_raw("graph_json=%7B%7D", CONTENT_TYPE_FORM)
                .effective_content_type(),
            Some(CONTENT_TYPE_FORM)
        );
        assert_eq!(RequestDescriptor::get("/monitor").effective_content_type(), None);
        assert_eq!(RequestDescriptor::delete("/monitor/1").effective_content_type(), None);
    }

    #[test]
    fn test_with_fields_falls_back_to_empty_body() {
        let empty = RequestDescriptor::post("/monitor/1/mute").with_fields(JsonBody::new());
        assert_eq!(empty.body, Body::Empty);

        let scoped = RequestDescriptor::post("/monitor/1/mute")
            .with_fields(JsonBody::new().field("scope", "role:db"));
        assert_eq!(scoped.body.as_json(), Some(&json!({"scope": "role:db"})));
    }

    #[test]
    fn test_body_accessors() {
        let descriptor = RequestDescriptor::post("/events").with_json(json!({"title": "t"}));
        assert_eq!(descriptor.body.as_json(), Some(&json!({"title": "t"})));
        assert_eq!(descriptor.body.as_raw(), None);
        assert_eq!(RequestDescriptor::get("/x").body, Body::None);
        assert_eq!(RequestDescriptor::post("/x").with_empty_body().body, Body::Empty);
    }
}
