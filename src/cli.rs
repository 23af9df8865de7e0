//! Command-line dispatch over the resource endpoints.
//!
//! `dogapi <resource> <subcommand> [args]` parses into a [`CliCommand`];
//! each resource module owns the clap enum for its subcommands and turns a
//! parsed one into a [`Call`]. Values that do not parse are rejected with
//! [`DatadogError::Usage`] instead of being left out of the request.

use clap::{CommandFactory, Parser, Subcommand};
use serde_json::Value;
use std::ffi::OsString;

use crate::api::comment::CommentCommand;
use crate::api::downtime::DowntimeCommand;
use crate::api::embed::EmbedCommand;
use crate::api::event::EventCommand;
use crate::api::graph::GraphCommand;
use crate::api::host::HostCommand;
use crate::api::infrastructure::InfrastructureCommand;
use crate::api::metric::MetricCommand;
use crate::api::monitor::MonitorCommand;
use crate::api::screenboard::ScreenboardCommand;
use crate::api::search::SearchCommand;
use crate::api::service_check::ServiceCheckCommand;
use crate::api::tag::TagCommand;
use crate::api::timeboard::TimeboardCommand;
use crate::api::user::UserCommand;
use crate::constants::Status;
use crate::errors::{DatadogError, Result};
use crate::normalize::{parse_int, PointsInput};
use crate::request::Call;
use crate::Dogapi;

/// Resource names accepted on the command line
pub const RESOURCES: [&str; 15] = [
    "comment",
    "downtime",
    "embed",
    "event",
    "graph",
    "host",
    "infrastructure",
    "metric",
    "monitor",
    "screenboard",
    "search",
    "servicecheck",
    "tag",
    "timeboard",
    "user",
];

/// A resource together with its parsed subcommand
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Comment on events
    Comment {
        #[command(subcommand)]
        command: CommentCommand,
    },
    /// Schedule and manage downtimes
    Downtime {
        #[command(subcommand)]
        command: DowntimeCommand,
    },
    /// Embeddable graphs
    Embed {
        #[command(subcommand)]
        command: EmbedCommand,
    },
    /// Post and query events
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Graph snapshots
    Graph {
        #[command(subcommand)]
        command: GraphCommand,
    },
    /// Mute and unmute hosts
    Host {
        #[command(subcommand)]
        command: HostCommand,
    },
    /// Search the infrastructure
    Infrastructure {
        #[command(subcommand)]
        command: InfrastructureCommand,
    },
    /// Send and query metrics
    Metric {
        #[command(subcommand)]
        command: MetricCommand,
    },
    /// Manage monitors
    Monitor {
        #[command(subcommand)]
        command: MonitorCommand,
    },
    /// Manage screenboards
    Screenboard {
        #[command(subcommand)]
        command: ScreenboardCommand,
    },
    /// Search metrics and hosts
    Search {
        #[command(subcommand)]
        command: SearchCommand,
    },
    /// Post service check results
    #[command(name = "servicecheck")]
    ServiceCheck {
        #[command(subcommand)]
        command: ServiceCheckCommand,
    },
    /// Manage host tags
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Manage timeboards
    Timeboard {
        #[command(subcommand)]
        command: TimeboardCommand,
    },
    /// Invite users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Parser, Debug)]
#[command(name = "dogapi", no_binary_name = true)]
struct CommandLine {
    #[command(subcommand)]
    command: CliCommand,
}

/// Parse `<resource> <subcommand> [args]`, without the program name
///
/// # Errors
///
/// Returns [`DatadogError::Usage`] carrying clap's message for unknown
/// resources or subcommands, missing arguments and values that do not
/// parse.
pub fn parse_args<I, T>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CommandLine::try_parse_from(args)
        .map(|line| line.command)
        .map_err(|err| DatadogError::Usage(err.to_string()))
}

/// Usage line for the whole command line
pub fn usage() -> String {
    CommandLine::command().render_usage().to_string()
}

fn resource_command(resource: &str) -> Option<clap::Command> {
    let mut command = CommandLine::command();
    command.build();
    command.find_subcommand(resource).cloned()
}

pub fn resource_usage(resource: &str) -> Option<String> {
    resource_command(resource).map(|mut command| command.render_usage().to_string())
}

pub fn resource_help(resource: &str) -> Option<String> {
    resource_command(resource).map(|mut command| command.render_long_help().to_string())
}

/// POSIX timestamp in seconds; a fractional part is dropped
pub(crate) fn parse_timestamp(raw: &str) -> std::result::Result<i64, String> {
    parse_int(raw).ok_or_else(|| format!("`{raw}` is not a POSIX timestamp"))
}

pub(crate) fn parse_json(raw: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid JSON: {err}"))
}

pub(crate) fn parse_points(raw: &str) -> std::result::Result<PointsInput, String> {
    PointsInput::from_json(&parse_json(raw)?)
        .ok_or_else(|| format!("`{raw}` is not a value, a [timestamp, value] pair or a list of them"))
}

pub(crate) fn parse_status(raw: &str) -> std::result::Result<Status, String> {
    let code = raw
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("`{raw}` is not a status code"))?;
    Status::try_from(code)
}

impl Dogapi {
    /// Turn a parsed command line into a call
    ///
    /// # Errors
    ///
    /// Returns [`DatadogError::Usage`] when an argument parses but its
    /// content does not fit, e.g. widgets that are not JSON objects.
    pub fn handle_cli(&self, command: CliCommand) -> Result<Call> {
        match command {
            CliCommand::Comment { command } => self.comment.handle_cli(command),
            CliCommand::Downtime { command } => self.downtime.handle_cli(command),
            CliCommand::Embed { command } => self.embed.handle_cli(command),
            CliCommand::Event { command } => self.event.handle_cli(command),
            CliCommand::Graph { command } => self.graph.handle_cli(command),
            CliCommand::Host { command } => self.host.handle_cli(command),
            CliCommand::Infrastructure { command } => self.infrastructure.handle_cli(command),
            CliCommand::Metric { command } => self.metric.handle_cli(command),
            CliCommand::Monitor { command } => self.monitor.handle_cli(command),
            CliCommand::Screenboard { command } => self.screenboard.handle_cli(command),
            CliCommand::Search { command } => self.search.handle_cli(command),
            CliCommand::ServiceCheck { command } => self.service_check.handle_cli(command),
            CliCommand::Tag { command } => self.tag.handle_cli(command),
            CliCommand::Timeboard { command } => self.timeboard.handle_cli(command),
            CliCommand::User { command } => self.user.handle_cli(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigUpdate;
    use crate::request::HttpMethod;

    #[test]
    fn test_command_line_is_consistent() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_help_covers_every_resource() {
        assert!(usage().contains("dogapi"));
        for resource in RESOURCES {
            let usage = resource_usage(resource).unwrap();
            assert!(usage.contains(resource), "{resource}: {usage}");
            assert!(resource_help(resource).is_some(), "{resource}");
        }
        assert!(resource_usage("dashboard").is_none());
    }

    #[test]
    fn test_dispatch_to_resource() {
        let dogapi = Dogapi::new(ConfigUpdate::new()).unwrap();
        let call = dogapi
            .handle_cli(parse_args(["monitor", "get", "42"]).unwrap())
            .unwrap();

        assert_eq!(call.descriptor().method, HttpMethod::Get);
        assert_eq!(call.descriptor().path, "/monitor/42");
    }

    #[test]
    fn test_unknown_resource_and_subcommand() {
        for args in [&["dashboard", "get"][..], &["monitor", "explode"], &["monitor"]] {
            let err = parse_args(args.iter().copied()).unwrap_err();
            assert!(matches!(err, DatadogError::Usage(_)), "{args:?}");
        }
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_timestamp("1500000000.7"), Ok(1_500_000_000));
        assert!(parse_timestamp("tomorrow").is_err());
        assert_eq!(parse_status("2"), Ok(Status::Critical));
        assert!(parse_status("4").is_err());
        assert!(parse_status("ok").is_err());
        assert!(parse_json("{oops").is_err());
        assert!(parse_points("twelve").is_err());
        assert_eq!(parse_points("12"), Ok(PointsInput::from(12)));
    }
}
