use clap::Subcommand;

use crate::cli::{parse_status, parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::constants::Status;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "servicecheck";

/// `dogapi servicecheck <subcommand>`
#[derive(Subcommand, Debug)]
pub enum ServiceCheckCommand {
    /// Report the status of a check on a host
    Check {
        check: String,
        host: String,
        /// 0 (ok), 1 (warning), 2 (critical) or 3 (unknown)
        #[arg(value_parser = parse_status)]
        status: Status,
        /// POSIX timestamp to use for the check
        #[arg(long, value_parser = parse_timestamp)]
        time: Option<i64>,
        /// Message to accompany the check
        #[arg(long)]
        message: Option<String>,
        /// Comma separated "tag:value" list
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCheckOptions {
    /// POSIX timestamp of the check, sent as `timestamp`
    pub time: Option<i64>,
    pub message: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Service check submission
#[derive(Clone)]
pub struct ServiceCheck {
    client: RequestClient,
}

impl ServiceCheck {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Report the status of `check` on `host_name`
    pub fn check(
        &self,
        check: &str,
        host_name: &str,
        status: Status,
        options: impl Into<OptionalArg<ServiceCheckOptions>>,
    ) -> Call {
        let (options, callback) =
            resolve_optional_args(options.into(), ServiceCheckOptions::default());
        let body = JsonBody::new()
            .field("check", check)
            .field("host_name", host_name)
            .field("status", status.code())
            .present("timestamp", options.time)
            .present("message", options.message)
            .present("tags", options.tags);
        self.client
            .call(RequestDescriptor::post("/check_run").with_json(body), callback)
    }

    pub fn handle_cli(&self, command: ServiceCheckCommand) -> Result<Call> {
        let ServiceCheckCommand::Check {
            check,
            host,
            status,
            time,
            message,
            tags,
        } = command;
        let options = ServiceCheckOptions {
            time,
            message,
            tags,
        };
        Ok(self.check(&check, &host, status, options))
    }
}
