use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use url::form_urlencoded;

use clap::Subcommand;

use crate::cli::{parse_json, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::QueryParams;
use crate::request::{
    resolve_optional_args, Call, OptionalArg, RequestDescriptor, CONTENT_TYPE_FORM,
};

const RESOURCE: &str = "embed";

/// `dogapi embed <subcommand>`
#[derive(Subcommand, Debug)]
pub enum EmbedCommand {
    /// Create a new graph embed from a JSON graph definition
    Create {
        #[arg(value_parser = parse_json)]
        graph_json: Value,
        /// Timeframe of the graph, e.g. "1_hour" or "4_hours"
        #[arg(long)]
        timeframe: Option<String>,
        /// Size of the graph: small, medium, large or xlarge
        #[arg(long)]
        size: Option<String>,
        /// Show the legend
        #[arg(long)]
        legend: bool,
        /// Title of the graph
        #[arg(long)]
        title: Option<String>,
    },
    /// Revoke an embed
    Revoke { embed_id: String },
    /// Get all embeds
    #[command(name = "getall")]
    GetAll,
    /// Get a specific embed
    Get {
        embed_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        legend: bool,
        /// Template variable value, e.g. "$host=web-1"; may be repeated
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_template_value)]
        template_variables: Vec<(String, String)>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

fn parse_template_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("`{raw}` is not NAME=VALUE"))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    /// e.g. `1_hour`, `4_hours`, `1_day`
    pub timeframe: Option<String>,
    /// `small`, `medium`, `large` or `xlarge`
    pub size: Option<String>,
    pub legend: Option<bool>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedGetOptions {
    pub size: Option<String>,
    pub legend: Option<bool>,
    /// Values substituted for `$name` template variables
    pub template_variables: BTreeMap<String, String>,
}

/// Graph embed endpoints
#[derive(Clone)]
pub struct Embed {
    client: RequestClient,
}

impl Embed {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Create an embeddable graph from a graph definition
    ///
    /// The body is form encoded, with the definition as a JSON string.
    pub fn create(&self, graph_json: &Value, options: impl Into<OptionalArg<EmbedOptions>>) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), EmbedOptions::default());

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("graph_json", &graph_json.to_string());
        if let Some(timeframe) = &options.timeframe {
            form.append_pair("timeframe", timeframe);
        }
        if let Some(size) = &options.size {
            form.append_pair("size", size);
        }
        if let Some(legend) = options.legend {
            form.append_pair("legend", yes_no(legend));
        }
        if let Some(title) = &options.title {
            form.append_pair("title", title);
        }

        self.client.call(
            RequestDescriptor::post("/graph/embed").with_raw(form.finish(), CONTENT_TYPE_FORM),
            callback,
        )
    }

    pub fn revoke(&self, embed_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::get(format!("/graph/embed/{embed_id}/revoke")), None)
    }

    pub fn get_all(&self) -> Call {
        self.client.call(RequestDescriptor::get("/graph/embed"), None)
    }

    pub fn get(&self, embed_id: impl Display, options: impl Into<OptionalArg<EmbedGetOptions>>) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), EmbedGetOptions::default());
        let mut query = QueryParams::new()
            .present("size", options.size)
            .present("legend", options.legend.map(yes_no));
        for (name, value) in &options.template_variables {
            query = query.param(name, value);
        }
        self.client.call(
            RequestDescriptor::get(format!("/graph/embed/{embed_id}")).with_query(query),
            callback,
        )
    }

    pub fn handle_cli(&self, command: EmbedCommand) -> Result<Call> {
        let call = match command {
            EmbedCommand::Create {
                graph_json,
                timeframe,
                size,
                legend,
                title,
            } => {
                let options = EmbedOptions {
                    timeframe,
                    size,
                    legend: legend.then_some(true),
                    title,
                };
                self.create(&graph_json, options)
            }
            EmbedCommand::Revoke { embed_id } => self.revoke(embed_id),
            EmbedCommand::GetAll => self.get_all(),
            EmbedCommand::Get {
                embed_id,
                size,
                legend,
                template_variables,
            } => {
                let options = EmbedGetOptions {
                    size,
                    legend: legend.then_some(true),
                    template_variables: template_variables.into_iter().collect(),
                };
                self.get(embed_id, options)
            }
        };
        Ok(call)
    }
}
