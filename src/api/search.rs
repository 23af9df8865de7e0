use clap::Subcommand;

use crate::cli::{resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::QueryParams;
use crate::request::{Call, RequestDescriptor};

const RESOURCE: &str = "search";

/// `dogapi search <subcommand>`
#[derive(Subcommand, Debug)]
pub enum SearchCommand {
    /// Search for metric or host names
    Query { query: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Clone)]
pub struct Search {
    client: RequestClient,
}

impl Search {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Search metric and host names; `hosts:` or `metrics:` prefixes narrow the facet
    pub fn query(&self, query: &str) -> Call {
        self.client.call(
            RequestDescriptor::get("/search").with_query(QueryParams::new().param("q", query)),
            None,
        )
    }

    pub fn handle_cli(&self, command: SearchCommand) -> Result<Call> {
        let SearchCommand::Query { query } = command;
        Ok(self.query(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};

    #[test]
    fn test_query() {
        let call = Search::new(test_client()).query("hosts:web");
        assert_eq!(call.descriptor().path, "/search");
        assert_eq!(call.descriptor().query.get("q"), Some("hosts:web"));
    }

    #[test]
    fn test_cli_requires_query() {
        assert!(run_cli(["search", "query"]).is_err());
        assert!(run_cli(["search", "find", "x"]).is_err());

        let call = run_cli(["search", "query", "metrics:cpu"]).unwrap();
        assert_eq!(call.descriptor().query.get("q"), Some("metrics:cpu"));
    }
}
