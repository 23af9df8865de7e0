use clap::Subcommand;

use crate::cli::{resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::QueryParams;
use crate::request::{Call, RequestDescriptor};

const RESOURCE: &str = "infrastructure";

/// `dogapi infrastructure <subcommand>`
#[derive(Subcommand, Debug)]
pub enum InfrastructureCommand {
    /// Search for hosts or metrics, e.g. "hosts:" or "metrics:"
    Search { query: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// Host and metric search
#[derive(Clone)]
pub struct Infrastructure {
    client: RequestClient,
}

impl Infrastructure {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn search(&self, query: &str) -> Call {
        let query = QueryParams::new().param("q", query);
        self.client
            .call(RequestDescriptor::get("/search").with_query(query), None)
    }

    pub fn handle_cli(&self, command: InfrastructureCommand) -> Result<Call> {
        let InfrastructureCommand::Search { query } = command;
        Ok(self.search(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use crate::request::HttpMethod;

    #[test]
    fn test_search() {
        let call = Infrastructure::new(test_client()).search("hosts:");
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.path, "/search");
        assert_eq!(descriptor.query.get("q"), Some("hosts:"));
    }

    #[test]
    fn test_cli_search() {
        let call = run_cli(["infrastructure", "search", "metrics:cpu"]).unwrap();
        assert_eq!(call.descriptor().query.get("q"), Some("metrics:cpu"));
    }
}
