use std::fmt::Display;

use clap::Subcommand;

use crate::cli::{parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::{JsonBody, QueryParams};
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "event";

/// `dogapi event <subcommand>`
#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Get an event
    Get { event_id: String },
    /// Query the event stream between two POSIX timestamps
    Query {
        #[arg(value_parser = parse_timestamp)]
        from: i64,
        #[arg(value_parser = parse_timestamp)]
        to: i64,
        /// Priority of the events, "normal" or "low"
        #[arg(long)]
        priority: Option<String>,
        /// Comma separated sources, e.g. "users,jenkins,chef"
        #[arg(long, value_delimiter = ',')]
        sources: Option<Vec<String>>,
        /// Comma separated "tag:value" list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    /// Post a new event
    Create {
        title: String,
        text: String,
        /// POSIX timestamp for when the event happened
        #[arg(long, value_parser = parse_timestamp)]
        time: Option<i64>,
        /// Priority of the event, "normal" or "low"
        #[arg(long)]
        priority: Option<String>,
        /// Host to associate the event with
        #[arg(long)]
        host: Option<String>,
        /// Comma separated "tag:value" list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Event type: error, warning, info or success
        #[arg(long = "type")]
        alert_type: Option<String>,
        /// Aggregation key grouping like events
        #[arg(long = "agg-key")]
        aggregation_key: Option<String>,
        /// Source type of the event, e.g. "nagios" or "jenkins"
        #[arg(long = "source-type")]
        source_type_name: Option<String>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// Optional event fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventProperties {
    /// POSIX timestamp of the event; the API defaults to now
    pub date_happened: Option<i64>,
    /// `normal` or `low`
    pub priority: Option<String>,
    pub host: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `error`, `warning`, `info` or `success`
    pub alert_type: Option<String>,
    pub aggregation_key: Option<String>,
    /// e.g. `nagios`, `jenkins`, `my apps`
    pub source_type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQueryOptions {
    pub priority: Option<String>,
    pub sources: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Event stream endpoints
#[derive(Clone)]
pub struct Event {
    client: RequestClient,
}

impl Event {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Post a new event to the stream
    pub fn create(
        &self,
        title: &str,
        text: &str,
        properties: impl Into<OptionalArg<EventProperties>>,
    ) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), EventProperties::default());
        let body = JsonBody::new()
            .field("title", title)
            .field("text", text)
            .present("date_happened", properties.date_happened)
            .present("priority", properties.priority)
            .present("host", properties.host)
            .present("tags", properties.tags)
            .present("alert_type", properties.alert_type)
            .present("aggregation_key", properties.aggregation_key)
            .present("source_type_name", properties.source_type_name);
        self.client
            .call(RequestDescriptor::post("/events").with_json(body), callback)
    }

    pub fn get(&self, event_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::get(format!("/events/{event_id}")), None)
    }

    /// Query the event stream between two POSIX timestamps
    pub fn query(&self, start: i64, end: i64, options: impl Into<OptionalArg<EventQueryOptions>>) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), EventQueryOptions::default());
        let query = QueryParams::new()
            .param("start", start)
            .param("end", end)
            .present("priority", options.priority)
            .csv("sources", options.sources.as_deref())
            .csv("tags", options.tags.as_deref());
        self.client
            .call(RequestDescriptor::get("/events").with_query(query), callback)
    }

    pub fn handle_cli(&self, command: EventCommand) -> Result<Call> {
        let call = match command {
            EventCommand::Get { event_id } => self.get(event_id),
            EventCommand::Query {
                from,
                to,
                priority,
                sources,
                tags,
            } => {
                let options = EventQueryOptions {
                    priority,
                    sources,
                    tags,
                };
                self.query(from, to, options)
            }
            EventCommand::Create {
                title,
                text,
                time,
                priority,
                host,
                tags,
                alert_type,
                aggregation_key,
                source_type_name,
            } => {
                let properties = EventProperties {
                    date_happened: time,
                    priority,
                    host,
                    tags,
                    alert_type,
                    aggregation_key,
                    source_type_name,
                };
                self.create(&title, &text, properties)
            }
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use crate::errors::DatadogError;
    use crate::request::HttpMethod;
    use serde_json::json;

    fn event() -> Event {
        Event::new(test_client())
    }

    #[test]
    fn test_create_title_and_text_only() {
        let call = event().create("Some event", "**THIS** happened", OptionalArg::Omitted);
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "/events");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({"title": "Some event", "text": "**THIS** happened"}))
        );
    }

    #[test]
    fn test_create_with_properties() {
        let call = event().create(
            "deploy",
            "v1.2.3",
            EventProperties {
                alert_type: Some("success".to_string()),
                tags: Some(vec!["service:api".to_string()]),
                aggregation_key: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({
                "title": "deploy",
                "text": "v1.2.3",
                "alert_type": "success",
                "tags": ["service:api"],
                "aggregation_key": ""
            }))
        );
    }

    #[test]
    fn test_get_path() {
        let call = event().get(1_234_567_890_123_i64);
        assert_eq!(call.descriptor().path, "/events/1234567890123");
    }

    #[test]
    fn test_query_joins_lists() {
        let call = event().query(
            1_500_000_000,
            1_500_003_600,
            EventQueryOptions {
                priority: Some("normal".to_string()),
                sources: Some(vec!["jenkins".to_string(), "chef".to_string()]),
                tags: None,
            },
        );
        let query = &call.descriptor().query;

        assert_eq!(query.get("start"), Some("1500000000"));
        assert_eq!(query.get("end"), Some("1500003600"));
        assert_eq!(query.get("priority"), Some("normal"));
        assert_eq!(query.get("sources"), Some("jenkins,chef"));
        assert_eq!(query.get("tags"), None);
    }

    #[test]
    fn test_cli_create() {
        let call = run_cli([
            "event",
            "create",
            "title",
            "text",
            "--time",
            "1500000000",
            "--agg-key",
            "deploys",
            "--tags",
            "a:1,b:2",
        ])
        .unwrap();
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({
                "title": "title",
                "text": "text",
                "date_happened": 1500000000,
                "aggregation_key": "deploys",
                "tags": ["a:1", "b:2"]
            }))
        );
    }

    #[test]
    fn test_cli_query() {
        let call = run_cli(["event", "query", "1500000000", "1500003600", "--sources", "jenkins,chef"]).unwrap();
        let query = &call.descriptor().query;
        assert_eq!(query.get("start"), Some("1500000000"));
        assert_eq!(query.get("end"), Some("1500003600"));
        assert_eq!(query.get("sources"), Some("jenkins,chef"));
        assert_eq!(query.get("tags"), None);
    }

    #[test]
    fn test_cli_rejects_non_numeric_time() {
        let err = run_cli(["event", "create", "title", "text", "--time", "yesterday"]).unwrap_err();
        assert!(matches!(err, DatadogError::Usage(_)));
        assert!(run_cli(["event", "query", "then", "1500003600"]).is_err());
    }
}
