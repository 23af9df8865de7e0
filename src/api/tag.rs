use std::fmt::Display;

use clap::Subcommand;

use crate::cli::{resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::{JsonBody, QueryParams};
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "tag";

/// `dogapi tag <subcommand>`
#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Get all tags
    #[command(name = "getall")]
    GetAll {
        /// Source of the tags, e.g. "chef", "user" or "jenkins"
        #[arg(long)]
        source: Option<String>,
    },
    /// Get the tags of a host
    Get {
        host: String,
        #[arg(long)]
        source: Option<String>,
        /// Group the results by source
        #[arg(long)]
        by_source: bool,
    },
    /// Delete the tags of a host
    #[command(alias = "delete")]
    Remove {
        host: String,
        #[arg(long)]
        source: Option<String>,
    },
    /// Add comma separated "tag:value" pairs to a host
    Create {
        host: String,
        #[arg(value_delimiter = ',', required = true)]
        tags: Vec<String>,
        #[arg(long)]
        source: Option<String>,
    },
    /// Replace the tags of a host with comma separated "tag:value" pairs
    Update {
        host: String,
        #[arg(value_delimiter = ',', required = true)]
        tags: Vec<String>,
        #[arg(long)]
        source: Option<String>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

fn source_arg(source: Option<String>) -> OptionalArg<String> {
    source.map_or(OptionalArg::Omitted, OptionalArg::Options)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Only show tags from this source (chef, puppet, users, ...)
    pub source: Option<String>,
    /// Group the results by source
    pub by_source: Option<bool>,
}

/// Host tag endpoints
#[derive(Clone)]
pub struct Tag {
    client: RequestClient,
}

impl Tag {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Get all host tags, optionally for one source
    pub fn get_all(&self, source: impl Into<OptionalArg<String>>) -> Call {
        let (source, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(source).map(Some), None);
        let query = QueryParams::new().present("source", source);
        self.client
            .call(RequestDescriptor::get("/tags/hosts").with_query(query), callback)
    }

    /// Get the tags of a host name or host id
    pub fn get(&self, hostname: impl Display, options: impl Into<OptionalArg<TagOptions>>) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), TagOptions::default());
        let query = QueryParams::new()
            .present("source", options.source)
            .present("by_source", options.by_source);
        self.client.call(
            RequestDescriptor::get(format!("/tags/hosts/{hostname}")).with_query(query),
            callback,
        )
    }

    /// Assign new tags to a host
    pub fn create(
        &self,
        hostname: impl Display,
        tags: Vec<String>,
        source: impl Into<OptionalArg<String>>,
    ) -> Call {
        let (source, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(source).map(Some), None);
        let body = JsonBody::new()
            .field("tags", tags)
            .present("source", source);
        self.client.call(
            RequestDescriptor::post(format!("/tags/hosts/{hostname}")).with_json(body),
            callback,
        )
    }

    /// Replace the tags of a host
    pub fn update(
        &self,
        hostname: impl Display,
        tags: Vec<String>,
        source: impl Into<OptionalArg<String>>,
    ) -> Call {
        let (source, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(source).map(Some), None);
        let body = JsonBody::new()
            .field("tags", tags)
            .present("source", source);
        self.client.call(
            RequestDescriptor::put(format!("/tags/hosts/{hostname}")).with_json(body),
            callback,
        )
    }

    /// Delete the tags of a host
    pub fn remove(&self, hostname: impl Display, source: impl Into<OptionalArg<String>>) -> Call {
        let (source, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(source).map(Some), None);
        let query = QueryParams::new().present("source", source);
        self.client.call(
            RequestDescriptor::delete(format!("/tags/hosts/{hostname}")).with_query(query),
            callback,
        )
    }

    pub fn handle_cli(&self, command: TagCommand) -> Result<Call> {
        let call = match command {
            TagCommand::GetAll { source } => self.get_all(source_arg(source)),
            TagCommand::Get {
                host,
                source,
                by_source,
            } => {
                let options = TagOptions {
                    source,
                    by_source: by_source.then_some(true),
                };
                self.get(host, options)
            }
            TagCommand::Remove { host, source } => self.remove(host, source_arg(source)),
            TagCommand::Create { host, tags, source } => {
                self.create(host, tags, source_arg(source))
            }
            TagCommand::Update { host, tags, source } => {
                self.update(host, tags, source_arg(source))
            }
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use crate::request::HttpMethod;
    use serde_json::json;

    fn tag() -> Tag {
        Tag::new(test_client())
    }

    #[test]
    fn test_get_all_without_source() {
        let call = tag().get_all(OptionalArg::Omitted);
        assert_eq!(call.descriptor().path, "/tags/hosts");
        assert!(call.descriptor().query.is_empty());
    }

    #[test]
    fn test_get_all_with_callback_first() {
        let call = tag().get_all(OptionalArg::callback(|_| {}));
        assert!(call.has_callback());
        assert!(call.descriptor().query.is_empty());
    }

    #[test]
    fn test_get_with_options() {
        let call = tag().get(
            "host.name",
            TagOptions {
                source: Some("chef".to_string()),
                by_source: Some(false),
            },
        );
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.path, "/tags/hosts/host.name");
        assert_eq!(descriptor.query.get("source"), Some("chef"));
        assert_eq!(descriptor.query.get("by_source"), Some("false"));
    }

    #[test]
    fn test_create_and_update_bodies() {
        let create = tag().create("host.name", vec!["role:webserver".to_string()], "users");
        assert_eq!(create.descriptor().method, HttpMethod::Post);
        assert_eq!(
            create.descriptor().body.as_json(),
            Some(&json!({"tags": ["role:webserver"], "source": "users"}))
        );

        let update = tag().update("host.name", vec!["role:db".to_string()], OptionalArg::Omitted);
        assert_eq!(update.descriptor().method, HttpMethod::Put);
        assert_eq!(
            update.descriptor().body.as_json(),
            Some(&json!({"tags": ["role:db"]}))
        );
    }

    #[test]
    fn test_remove_with_source() {
        let call = tag().remove("host.name", "chef");
        assert_eq!(call.descriptor().method, HttpMethod::Delete);
        assert_eq!(call.descriptor().query.get("source"), Some("chef"));
    }

    #[test]
    fn test_cli_create_splits_tags() {
        let call = run_cli(["tag", "create", "host-1", "role:db,env:prod", "--source", "chef"]).unwrap();

        assert_eq!(call.descriptor().path, "/tags/hosts/host-1");
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({"tags": ["role:db", "env:prod"], "source": "chef"}))
        );
    }

    #[test]
    fn test_cli_get_by_source() {
        let call = run_cli(["tag", "get", "--by-source", "host-1"]).unwrap();
        assert_eq!(call.descriptor().path, "/tags/hosts/host-1");
        assert_eq!(call.descriptor().query.get("by_source"), Some("true"));
        assert_eq!(call.descriptor().query.get("source"), None);
    }

    #[test]
    fn test_cli_missing_tags() {
        assert!(run_cli(["tag", "update", "host-1"]).is_err());
    }

    #[test]
    fn test_cli_delete_alias_and_getall_source() {
        let call = run_cli(["tag", "delete", "host-1", "--source", "chef"]).unwrap();
        assert_eq!(call.descriptor().method, HttpMethod::Delete);
        assert_eq!(call.descriptor().query.get("source"), Some("chef"));

        let call = run_cli(["tag", "getall"]).unwrap();
        assert!(call.descriptor().query.is_empty());
    }
}
