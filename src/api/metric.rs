use serde_json::Value;

use clap::Subcommand;

use crate::cli::{parse_points, parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::{normalize_points, now, JsonBody, PointsInput, QueryParams};
use crate::request::{resolve_optional_args, Call, Callback, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "metric";

/// `dogapi metric <subcommand>`
#[derive(Subcommand, Debug)]
pub enum MetricCommand {
    /// Add a new point for a metric
    ///
    /// The point is JSON: a value stamped with the current time, a
    /// `[timestamp, value]` pair, or a list of either.
    Send {
        metric: String,
        #[arg(value_parser = parse_points, allow_negative_numbers = true)]
        point: PointsInput,
        /// Comma separated "tag:value" list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Host to associate with the metric
        #[arg(long)]
        host: Option<String>,
        /// Metric type, e.g. "gauge" or "count"
        #[arg(long = "type")]
        metric_type: Option<String>,
    },
    /// Query a metric between two POSIX timestamps
    Query {
        #[arg(value_parser = parse_timestamp)]
        from: i64,
        #[arg(value_parser = parse_timestamp)]
        to: i64,
        query: String,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// Optional fields of a series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesOptions {
    pub host: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `"gauge"`, `"count"`, `"rate"`, ...
    pub r#type: Option<String>,
    /// Older spelling of `type`; ignored when `type` is set
    pub metric_type: Option<String>,
}

impl SeriesOptions {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_type(mut self, metric_type: impl Into<String>) -> Self {
        self.r#type = Some(metric_type.into());
        self
    }

    /// Resolved wire `type`: `type` first, then `metric_type`
    pub fn resolved_type(&self) -> Option<&str> {
        self.r#type.as_deref().or(self.metric_type.as_deref())
    }
}

/// One metric with its points, as passed to [`Metric::send_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: String,
    pub points: PointsInput,
    pub options: SeriesOptions,
}

impl Series {
    pub fn new(metric: impl Into<String>, points: impl Into<PointsInput>) -> Self {
        Self {
            metric: metric.into(),
            points: points.into(),
            options: SeriesOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SeriesOptions) -> Self {
        self.options = options;
        self
    }

    fn normalize(self, now: i64) -> Value {
        let metric_type = self.options.resolved_type().map(str::to_string);
        JsonBody::new()
            .field("metric", self.metric)
            .field("points", normalize_points(self.points, now))
            .present("type", metric_type)
            .present("host", self.options.host)
            .present("tags", self.options.tags)
            .into_value()
    }
}

/// Metric submission and query endpoints
#[derive(Clone)]
pub struct Metric {
    client: RequestClient,
}

impl Metric {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Submit points for a single metric
    ///
    /// `points` may be a scalar, a `(timestamp, value)` pair, a list of
    /// pairs, or a list of scalars; bare values are stamped with the
    /// current time.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dogapi::{default_client, OptionalArg, SeriesOptions};
    ///
    /// # async fn run() -> dogapi::Result<()> {
    /// let dogapi = default_client()?;
    /// dogapi.metric.send("my.metric", 500, OptionalArg::Omitted).await?;
    /// dogapi
    ///     .metric
    ///     .send("my.counter", 5, SeriesOptions::default().with_type("count"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send(
        &self,
        metric: &str,
        points: impl Into<PointsInput>,
        options: impl Into<OptionalArg<SeriesOptions>>,
    ) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), SeriesOptions::default());
        let series = Series::new(metric, points).with_options(options);
        self.submit(vec![series], callback)
    }

    /// Submit several series in one request
    pub fn send_all(&self, series: Vec<Series>) -> Call {
        self.submit(series, None)
    }

    fn submit(&self, series: Vec<Series>, callback: Option<Callback>) -> Call {
        let now = now();
        let series: Vec<Value> = series.into_iter().map(|s| s.normalize(now)).collect();
        let body = JsonBody::new().field("series", series);
        self.client
            .call(RequestDescriptor::post("/series").with_json(body), callback)
    }

    /// Query timeseries between two POSIX timestamps
    pub fn query(&self, from: i64, to: i64, query: &str) -> Call {
        let params = QueryParams::new()
            .param("from", from)
            .param("to", to)
            .param("query", query);
        self.client
            .call(RequestDescriptor::get("/query").with_query(params), None)
    }

    pub fn handle_cli(&self, command: MetricCommand) -> Result<Call> {
        let call = match command {
            MetricCommand::Send {
                metric,
                point,
                tags,
                host,
                metric_type,
            } => {
                let options = SeriesOptions {
                    host,
                    tags,
                    r#type: metric_type,
                    metric_type: None,
                };
                self.send(&metric, point, options)
            }
            MetricCommand::Query { from, to, query } => self.query(from, to, &query),
        };
        Ok(call)
    }
}
