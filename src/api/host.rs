use std::fmt::Display;

use clap::Subcommand;

use crate::cli::{parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "host";

/// `dogapi host <subcommand>`
#[derive(Subcommand, Debug)]
pub enum HostCommand {
    /// Mute a host
    Mute {
        hostname: String,
        /// POSIX timestamp for when the mute should end
        #[arg(long, value_parser = parse_timestamp)]
        end: Option<i64>,
        /// Override the end of an existing mute
        #[arg(long = "override")]
        override_end: bool,
    },
    /// Unmute a host
    Unmute { hostname: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMuteOptions {
    /// POSIX timestamp for when the mute ends
    pub end: Option<i64>,
    /// Replace the end of an existing mute
    pub override_end: Option<bool>,
}

/// Host mute endpoints
#[derive(Clone)]
pub struct Host {
    client: RequestClient,
}

impl Host {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Mute a host, if it is not already muted
    pub fn mute(&self, hostname: impl Display, options: impl Into<OptionalArg<HostMuteOptions>>) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), HostMuteOptions::default());
        let body = JsonBody::new()
            .present("end", options.end)
            .present("override", options.override_end);
        self.client.call(
            RequestDescriptor::post(format!("/host/{hostname}/mute")).with_fields(body),
            callback,
        )
    }

    pub fn unmute(&self, hostname: impl Display) -> Call {
        self.client.call(
            RequestDescriptor::post(format!("/host/{hostname}/unmute")).with_empty_body(),
            None,
        )
    }

    pub fn handle_cli(&self, command: HostCommand) -> Result<Call> {
        let call = match command {
            HostCommand::Mute {
                hostname,
                end,
                override_end,
            } => {
                let options = HostMuteOptions {
                    end,
                    override_end: override_end.then_some(true),
                };
                self.mute(hostname, options)
            }
            HostCommand::Unmute { hostname } => self.unmute(hostname),
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use crate::errors::DatadogError;
    use crate::request::{Body, HttpMethod};
    use serde_json::json;

    fn host() -> Host {
        Host::new(test_client())
    }

    #[test]
    fn test_mute_with_options() {
        let call = host().mute(
            "my.host.name",
            HostMuteOptions {
                end: Some(1_500_000_000),
                override_end: Some(false),
            },
        );
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "/host/my.host.name/mute");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({"end": 1500000000, "override": false}))
        );
    }

    #[test]
    fn test_mute_with_callback_only() {
        let call = host().mute("my.host.name", OptionalArg::callback(|_| {}));
        assert!(call.has_callback());
        assert_eq!(call.descriptor().body, Body::Empty);
    }

    #[test]
    fn test_unmute_sends_empty_body() {
        let call = host().unmute("my.host.name");
        assert_eq!(call.descriptor().path, "/host/my.host.name/unmute");
        assert_eq!(call.descriptor().body, Body::Empty);
    }

    #[test]
    fn test_cli_mute_reads_end_and_override() {
        let call = run_cli(["host", "mute", "web-1", "--end", "1500000000", "--override"]).unwrap();
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({"end": 1500000000, "override": true}))
        );
    }

    #[test]
    fn test_cli_override_flag_before_hostname() {
        let call = run_cli(["host", "mute", "--override", "web-1"]).unwrap();
        assert_eq!(call.descriptor().path, "/host/web-1/mute");
        assert_eq!(call.descriptor().body.as_json(), Some(&json!({"override": true})));
    }

    #[test]
    fn test_cli_mute_without_options_sends_empty_body() {
        let call = run_cli(["host", "mute", "web-1"]).unwrap();
        assert_eq!(call.descriptor().body, Body::Empty);
    }

    #[test]
    fn test_cli_rejects_non_numeric_end() {
        let err = run_cli(["host", "mute", "web-1", "--end", "tomorrow"]).unwrap_err();
        assert!(matches!(err, DatadogError::Usage(_)));
    }

    #[test]
    fn test_cli_requires_hostname() {
        assert!(run_cli(["host", "unmute"]).is_err());
        assert!(run_cli(["host", "reboot", "web-1"]).is_err());
    }
}
