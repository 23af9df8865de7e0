use std::fmt::Display;

use clap::{Args, Subcommand};

use crate::cli::{parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "downtime";

/// Options shared by `downtime create` and `downtime update`
#[derive(Args, Debug)]
pub struct DowntimeArgs {
    /// POSIX timestamp for when the downtime should start
    #[arg(long, value_parser = parse_timestamp)]
    start: Option<i64>,
    /// POSIX timestamp for when the downtime should end
    #[arg(long, value_parser = parse_timestamp)]
    end: Option<i64>,
    /// Message to accompany the downtime
    #[arg(long)]
    message: Option<String>,
}

impl DowntimeArgs {
    fn into_properties(self, scope: Option<String>) -> DowntimeProperties {
        DowntimeProperties {
            scope,
            start: self.start,
            end: self.end,
            message: self.message,
        }
    }
}

/// `dogapi downtime <subcommand>`
#[derive(Subcommand, Debug)]
pub enum DowntimeCommand {
    /// Create a new downtime for a scope, e.g. "env:staging"
    Create {
        scope: String,
        #[command(flatten)]
        args: DowntimeArgs,
    },
    /// Update an existing downtime
    Update {
        downtime_id: String,
        /// New scope of the downtime
        #[arg(long)]
        scope: Option<String>,
        #[command(flatten)]
        args: DowntimeArgs,
    },
    /// Remove a downtime
    Remove { downtime_id: String },
    /// Get a downtime
    Get { downtime_id: String },
    /// Get all downtimes
    #[command(name = "getall")]
    GetAll,
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DowntimeProperties {
    /// Scope the downtime applies to; only used on update
    pub scope: Option<String>,
    /// POSIX timestamp for when the downtime starts
    pub start: Option<i64>,
    /// POSIX timestamp for when the downtime ends
    pub end: Option<i64>,
    pub message: Option<String>,
}

/// Downtime endpoints
#[derive(Clone)]
pub struct Downtime {
    client: RequestClient,
}

impl Downtime {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Schedule a new downtime for `scope`, e.g. `env:staging`
    pub fn create(&self, scope: &str, properties: impl Into<OptionalArg<DowntimeProperties>>) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), DowntimeProperties::default());
        let body = JsonBody::new()
            .field("scope", scope)
            .present("start", properties.start)
            .present("end", properties.end)
            .present("message", properties.message);
        self.client
            .call(RequestDescriptor::post("/downtime").with_json(body), callback)
    }

    pub fn update(
        &self,
        downtime_id: impl Display,
        properties: impl Into<OptionalArg<DowntimeProperties>>,
    ) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), DowntimeProperties::default());
        let body = JsonBody::new()
            .present("scope", properties.scope)
            .present("start", properties.start)
            .present("end", properties.end)
            .present("message", properties.message);
        self.client.call(
            RequestDescriptor::put(format!("/downtime/{downtime_id}")).with_json(body),
            callback,
        )
    }

    pub fn remove(&self, downtime_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::delete(format!("/downtime/{downtime_id}")), None)
    }

    pub fn get(&self, downtime_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::get(format!("/downtime/{downtime_id}")), None)
    }

    // TODO: accept the `current_only` filter
    pub fn get_all(&self) -> Call {
        self.client.call(RequestDescriptor::get("/downtime"), None)
    }

    pub fn handle_cli(&self, command: DowntimeCommand) -> Result<Call> {
        let call = match command {
            DowntimeCommand::Create { scope, args } => {
                self.create(&scope, args.into_properties(None))
            }
            DowntimeCommand::Update {
                downtime_id,
                scope,
                args,
            } => self.update(downtime_id, args.into_properties(scope)),
            DowntimeCommand::Remove { downtime_id } => self.remove(downtime_id),
            DowntimeCommand::Get { downtime_id } => self.get(downtime_id),
            DowntimeCommand::GetAll => self.get_all(),
        };
        Ok(call)
    }
}
