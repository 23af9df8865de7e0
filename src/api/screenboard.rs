use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

use clap::{Args, Subcommand};

use crate::cli::{parse_json, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::{DatadogError, Result};
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "screenboard";

/// Options shared by `screenboard create` and `screenboard update`
#[derive(Args, Debug)]
pub struct ScreenboardArgs {
    /// Description of the screenboard's content
    #[arg(long)]
    description: Option<String>,
    /// JSON list of template variable definitions
    #[arg(long = "tmpvars", value_name = "TEMPLATE_VARIABLES", value_parser = parse_json)]
    template_variables: Option<Value>,
    /// Width of the screenboard in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Height of the screenboard in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl ScreenboardArgs {
    fn into_options(self) -> Result<ScreenboardOptions> {
        Ok(ScreenboardOptions {
            description: self.description,
            template_variables: self
                .template_variables
                .map(|value| template_variables(value, RESOURCE))
                .transpose()?,
            width: self.width,
            height: self.height,
            read_only: None,
        })
    }
}

/// `dogapi screenboard <subcommand>`
#[derive(Subcommand, Debug)]
pub enum ScreenboardCommand {
    /// Create a new screenboard; widgets are a JSON list of widget definitions
    Create {
        board_title: String,
        #[arg(value_parser = parse_json)]
        widgets: Value,
        #[command(flatten)]
        args: ScreenboardArgs,
    },
    /// Update an existing screenboard
    Update {
        board_id: String,
        board_title: String,
        #[arg(value_parser = parse_json)]
        widgets: Value,
        #[command(flatten)]
        args: ScreenboardArgs,
    },
    /// Remove a screenboard
    Remove { board_id: String },
    /// Get a screenboard
    Get { board_id: String },
    /// Get all screenboards
    #[command(name = "getall")]
    GetAll,
    /// Get share info for a screenboard
    Share { board_id: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

/// A dashboard template variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl From<TemplateVariable> for Value {
    fn from(variable: TemplateVariable) -> Self {
        JsonBody::new()
            .field("name", variable.name)
            .present("prefix", variable.prefix)
            .present("default", variable.default)
            .into_value()
    }
}

/// Optional screenboard fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenboardOptions {
    pub description: Option<String>,
    pub template_variables: Option<Vec<TemplateVariable>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub read_only: Option<bool>,
}

impl ScreenboardOptions {
    fn apply(self, body: JsonBody) -> JsonBody {
        body.present("description", self.description)
            .present("template_variables", self.template_variables)
            .present("width", self.width)
            .present("height", self.height)
            .present("read_only", self.read_only)
    }
}

/// Screenboard endpoints
#[derive(Clone)]
pub struct Screenboard {
    client: RequestClient,
}

impl Screenboard {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn create(
        &self,
        board_title: &str,
        widgets: Vec<Value>,
        options: impl Into<OptionalArg<ScreenboardOptions>>,
    ) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), ScreenboardOptions::default());
        let body = options.apply(
            JsonBody::new()
                .field("board_title", board_title)
                .field("widgets", widgets),
        );
        self.client
            .call(RequestDescriptor::post("/screen").with_json(body), callback)
    }

    /// Replace a screenboard definition
    pub fn update(
        &self,
        board_id: impl Display,
        board_title: &str,
        widgets: Vec<Value>,
        options: impl Into<OptionalArg<ScreenboardOptions>>,
    ) -> Call {
        let (options, callback) = resolve_optional_args(options.into(), ScreenboardOptions::default());
        let body = options.apply(
            JsonBody::new()
                .field("board_title", board_title)
                .field("widgets", widgets),
        );
        self.client.call(
            RequestDescriptor::put(format!("/screen/{board_id}")).with_json(body),
            callback,
        )
    }

    pub fn remove(&self, board_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::delete(format!("/screen/{board_id}")), None)
    }

    pub fn get(&self, board_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::get(format!("/screen/{board_id}")), None)
    }

    pub fn get_all(&self) -> Call {
        self.client.call(RequestDescriptor::get("/screen"), None)
    }

    /// Get a public share url for a screenboard
    pub fn share(&self, board_id: impl Display) -> Call {
        self.client.call(
            RequestDescriptor::post(format!("/screen/share/{board_id}")).with_empty_body(),
            None,
        )
    }

    pub fn handle_cli(&self, command: ScreenboardCommand) -> Result<Call> {
        let call = match command {
            ScreenboardCommand::Create {
                board_title,
                widgets,
                args,
            } => {
                let widgets = json_objects(widgets, RESOURCE)?;
                self.create(&board_title, widgets, args.into_options()?)
            }
            ScreenboardCommand::Update {
                board_id,
                board_title,
                widgets,
                args,
            } => {
                let widgets = json_objects(widgets, RESOURCE)?;
                self.update(board_id, &board_title, widgets, args.into_options()?)
            }
            ScreenboardCommand::Remove { board_id } => self.remove(board_id),
            ScreenboardCommand::Get { board_id } => self.get(board_id),
            ScreenboardCommand::GetAll => self.get_all(),
            ScreenboardCommand::Share { board_id } => self.share(board_id),
        };
        Ok(call)
    }
}

/// A JSON list of objects, or a single object
pub(crate) fn json_objects(value: Value, resource: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) => Ok(items),
        item @ Value::Object(_) => Ok(vec![item]),
        _ => Err(DatadogError::usage(resource)),
    }
}

pub(crate) fn template_variables(value: Value, resource: &str) -> Result<Vec<TemplateVariable>> {
    serde_json::from_value(value).map_err(|_| DatadogError::usage(resource))
}
