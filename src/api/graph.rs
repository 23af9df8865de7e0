use serde_json::Value;

use crate::api::embed::{Embed, EmbedOptions};
use clap::Subcommand;

use crate::cli::{parse_timestamp, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::QueryParams;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "graph";

/// `dogapi graph <subcommand>`
#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    /// Take a snapshot of a metric query between two POSIX timestamps
    Snapshot {
        query: String,
        #[arg(value_parser = parse_timestamp)]
        from: i64,
        #[arg(value_parser = parse_timestamp)]
        to: i64,
        /// Query for event bands to add to the snapshot
        #[arg(long = "events", value_name = "EVENT_QUERY")]
        event_query: Option<String>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// Graph snapshot endpoints
#[derive(Clone)]
pub struct Graph {
    client: RequestClient,
    embed: Embed,
}

impl Graph {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self {
            embed: Embed::new(client.clone()),
            client,
        }
    }

    /// Snapshot a metric query between two POSIX timestamps
    pub fn snapshot(
        &self,
        metric_query: &str,
        start: i64,
        end: i64,
        event_query: impl Into<OptionalArg<String>>,
    ) -> Call {
        let (event_query, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(event_query).map(Some), None);
        let query = QueryParams::new()
            .param("metric_query", metric_query)
            .param("start", start)
            .param("end", end)
            .present("event_query", event_query);
        self.client.call(
            RequestDescriptor::get("/graph/snapshot").with_query(query),
            callback,
        )
    }

    /// Same as [`Embed::create`]
    pub fn create_embed(&self, graph_json: &Value, options: impl Into<OptionalArg<EmbedOptions>>) -> Call {
        self.embed.create(graph_json, options)
    }

    pub fn handle_cli(&self, command: GraphCommand) -> Result<Call> {
        let GraphCommand::Snapshot {
            query,
            from,
            to,
            event_query,
        } = command;
        Ok(match event_query {
            Some(event_query) => self.snapshot(&query, from, to, event_query),
            None => self.snapshot(&query, from, to, OptionalArg::Omitted),
        })
    }
}
