use serde_json::{Map, Value};
use std::fmt::Display;

use clap::{Args, Subcommand};

use crate::cli::{parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::{JsonBody, QueryParams};
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "monitor";

/// Options shared by `monitor create` and `monitor update`
#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Name of the monitor
    #[arg(long)]
    name: Option<String>,
    /// Notification message of the monitor
    #[arg(long)]
    message: Option<String>,
}

impl From<MonitorArgs> for MonitorProperties {
    fn from(args: MonitorArgs) -> Self {
        Self {
            name: args.name,
            message: args.message,
            ..Default::default()
        }
    }
}

/// `dogapi monitor <subcommand>`
#[derive(Subcommand, Debug)]
pub enum MonitorCommand {
    /// Create a new monitor, e.g. of type "metric alert"
    Create {
        #[arg(value_name = "TYPE")]
        monitor_type: String,
        query: String,
        #[command(flatten)]
        args: MonitorArgs,
    },
    /// Get a monitor
    Get {
        monitor_id: String,
        /// Comma separated group states: all, alert, warn or "no data"
        #[arg(long, value_delimiter = ',')]
        states: Option<Vec<String>>,
    },
    /// Get all monitors
    #[command(name = "getall")]
    GetAll {
        /// Comma separated group states: all, alert, warn or "no data"
        #[arg(long, value_delimiter = ',')]
        states: Option<Vec<String>>,
        /// Comma separated "tag:value" list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    /// Mute a monitor
    Mute {
        monitor_id: String,
        /// Scope to mute, e.g. "role:db"
        #[arg(long)]
        scope: Option<String>,
        /// POSIX timestamp for when the mute should end
        #[arg(long, value_parser = parse_timestamp)]
        end: Option<i64>,
    },
    /// Mute all monitors
    #[command(name = "muteall")]
    MuteAll,
    /// Delete a monitor
    Remove { monitor_id: String },
    /// Unmute a monitor
    Unmute {
        monitor_id: String,
        /// Scope to unmute, e.g. "role:db"
        #[arg(long)]
        scope: Option<String>,
    },
    /// Unmute all monitors
    #[command(name = "unmuteall")]
    UnmuteAll,
    /// Update an existing monitor
    Update {
        monitor_id: String,
        query: String,
        #[command(flatten)]
        args: MonitorArgs,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// Optional monitor fields for create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorProperties {
    pub name: Option<String>,
    pub message: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Free-form monitor options (thresholds, notify_no_data, ...)
    pub options: Option<Map<String, Value>>,
}

impl MonitorProperties {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
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

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = Some(options);
        self
    }

    fn apply(self, body: JsonBody) -> JsonBody {
        body.present("name", self.name)
            .present("message", self.message)
            .present("tags", self.tags)
            .present("options", self.options)
    }
}

/// Filters for listing monitors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorListOptions {
    /// Any of "all", "alert", "warn", "no data"
    pub group_states: Option<Vec<String>>,
    /// `tag:value` pairs to filter on
    pub tags: Option<Vec<String>>,
    /// Service and/or custom monitor tags
    pub monitor_tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorMuteOptions {
    /// Scope to mute, e.g. `role:db`
    pub scope: Option<String>,
    /// POSIX timestamp for when the mute ends
    pub end: Option<i64>,
}

/// Monitor endpoints
#[derive(Clone)]
pub struct Monitor {
    client: RequestClient,
}

impl Monitor {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Create a new monitor
    ///
    /// `monitor_type` is e.g. `"metric alert"` or `"service check"`.
    pub fn create(
        &self,
        monitor_type: &str,
        query: &str,
        properties: impl Into<OptionalArg<MonitorProperties>>,
    ) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), MonitorProperties::default());
        let body = properties.apply(
            JsonBody::new()
                .field("type", monitor_type)
                .field("query", query),
        );
        self.client
            .call(RequestDescriptor::post("/monitor").with_json(body), callback)
    }

    /// Get a monitor, optionally restricted to some group states
    pub fn get(
        &self,
        monitor_id: impl Display,
        group_states: impl Into<OptionalArg<Vec<String>>>,
    ) -> Call {
        let (group_states, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(group_states).map(Some), None);
        let query = QueryParams::new().csv("group_states", group_states.as_deref());
        self.client.call(
            RequestDescriptor::get(format!("/monitor/{monitor_id}")).with_query(query),
            callback,
        )
    }

    pub fn get_all(&self, options: impl Into<OptionalArg<MonitorListOptions>>) -> Call {
        let (options, callback) =
            resolve_optional_args(options.into(), MonitorListOptions::default());
        let query = QueryParams::new()
            .csv("group_states", options.group_states.as_deref())
            .csv("tags", options.tags.as_deref())
            .csv("monitor_tags", options.monitor_tags.as_deref());
        self.client
            .call(RequestDescriptor::get("/monitor").with_query(query), callback)
    }

    pub fn update(
        &self,
        monitor_id: impl Display,
        query: &str,
        properties: impl Into<OptionalArg<MonitorProperties>>,
    ) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), MonitorProperties::default());
        let body = properties.apply(JsonBody::new().field("query", query));
        self.client.call(
            RequestDescriptor::put(format!("/monitor/{monitor_id}")).with_json(body),
            callback,
        )
    }

    pub fn remove(&self, monitor_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::delete(format!("/monitor/{monitor_id}")), None)
    }

    pub fn mute(
        &self,
        monitor_id: impl Display,
        options: impl Into<OptionalArg<MonitorMuteOptions>>,
    ) -> Call {
        let (options, callback) =
            resolve_optional_args(options.into(), MonitorMuteOptions::default());
        let body = JsonBody::new()
            .present("scope", options.scope)
            .present("end", options.end);
        self.client.call(
            RequestDescriptor::post(format!("/monitor/{monitor_id}/mute")).with_fields(body),
            callback,
        )
    }

    pub fn mute_all(&self) -> Call {
        self.client.call(
            RequestDescriptor::post("/monitor/mute_all").with_empty_body(),
            None,
        )
    }

    /// Unmute a monitor, optionally only for `scope`
    pub fn unmute(&self, monitor_id: impl Display, scope: impl Into<OptionalArg<String>>) -> Call {
        let (scope, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(scope).map(Some), None);
        let descriptor = RequestDescriptor::post(format!("/monitor/{monitor_id}/unmute"));
        let descriptor = match scope {
            Some(scope) => descriptor.with_json(JsonBody::new().field("scope", scope)),
            None => descriptor.with_empty_body(),
        };
        self.client.call(descriptor, callback)
    }

    pub fn unmute_all(&self) -> Call {
        self.client.call(
            RequestDescriptor::post("/monitor/unmute_all").with_empty_body(),
            None,
        )
    }

    pub fn handle_cli(&self, command: MonitorCommand) -> Result<Call> {
        let call = match command {
            MonitorCommand::Create {
                monitor_type,
                query,
                args,
            } => self.create(&monitor_type, &query, MonitorProperties::from(args)),
            MonitorCommand::Get { monitor_id, states } => match states {
                Some(states) => self.get(monitor_id, states),
                None => self.get(monitor_id, OptionalArg::Omitted),
            },
            MonitorCommand::GetAll { states, tags } => self.get_all(MonitorListOptions {
                group_states: states,
                tags,
                monitor_tags: None,
            }),
            MonitorCommand::Mute {
                monitor_id,
                scope,
                end,
            } => self.mute(monitor_id, MonitorMuteOptions { scope, end }),
            MonitorCommand::MuteAll => self.mute_all(),
            MonitorCommand::Remove { monitor_id } => self.remove(monitor_id),
            MonitorCommand::Unmute { monitor_id, scope } => match scope {
                Some(scope) => self.unmute(monitor_id, scope),
                None => self.unmute(monitor_id, OptionalArg::Omitted),
            },
            MonitorCommand::UnmuteAll => self.unmute_all(),
            MonitorCommand::Update {
                monitor_id,
                query,
                args,
            } => self.update(monitor_id, &query, MonitorProperties::from(args)),
        };
        Ok(call)
    }
}
