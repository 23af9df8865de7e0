use serde_json::Value;
use std::fmt::Display;

use clap::Subcommand;

use crate::api::screenboard::{json_objects, template_variables, TemplateVariable};
use crate::cli::{parse_json, resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "timeboard";

/// `dogapi timeboard <subcommand>`
#[derive(Subcommand, Debug)]
pub enum TimeboardCommand {
    /// Create a new timeboard; graphs are a JSON list of graph definitions
    Create {
        title: String,
        description: String,
        #[arg(value_parser = parse_json)]
        graphs: Value,
        /// JSON list of template variable definitions
        #[arg(long = "tmpvars", value_name = "TEMPLATE_VARIABLES", value_parser = parse_json)]
        template_variables: Option<Value>,
    },
    /// Update an existing timeboard
    Update {
        dash_id: String,
        title: String,
        description: String,
        #[arg(value_parser = parse_json)]
        graphs: Value,
        /// JSON list of template variable definitions
        #[arg(long = "tmpvars", value_name = "TEMPLATE_VARIABLES", value_parser = parse_json)]
        template_variables: Option<Value>,
    },
    /// Remove a timeboard
    Remove { dash_id: String },
    /// Get all timeboards
    #[command(name = "getall")]
    GetAll,
    /// Get a timeboard
    Get { dash_id: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

fn cli_template_variables(value: Option<Value>) -> Result<OptionalArg<Vec<TemplateVariable>>> {
    Ok(match value {
        Some(value) => OptionalArg::Options(template_variables(value, RESOURCE)?),
        None => OptionalArg::Omitted,
    })
}

/// Timeboard (dashboard) endpoints
#[derive(Clone)]
pub struct Timeboard {
    client: RequestClient,
}

impl Timeboard {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    fn body(
        title: &str,
        description: &str,
        graphs: Vec<Value>,
        template_variables: Option<Vec<TemplateVariable>>,
    ) -> JsonBody {
        JsonBody::new()
            .field("title", title)
            .field("description", description)
            .field("graphs", graphs)
            .present("template_variables", template_variables)
    }

    pub fn create(
        &self,
        title: &str,
        description: &str,
        graphs: Vec<Value>,
        template_variables: impl Into<OptionalArg<Vec<TemplateVariable>>>,
    ) -> Call {
        let (template_variables, callback) = resolve_optional_args(
            Into::<OptionalArg<_>>::into(template_variables).map(Some),
            None,
        );
        let body = Self::body(title, description, graphs, template_variables);
        self.client
            .call(RequestDescriptor::post("/dash").with_json(body), callback)
    }

    pub fn update(
        &self,
        dash_id: impl Display,
        title: &str,
        description: &str,
        graphs: Vec<Value>,
        template_variables: impl Into<OptionalArg<Vec<TemplateVariable>>>,
    ) -> Call {
        let (template_variables, callback) = resolve_optional_args(
            Into::<OptionalArg<_>>::into(template_variables).map(Some),
            None,
        );
        let body = Self::body(title, description, graphs, template_variables);
        self.client.call(
            RequestDescriptor::put(format!("/dash/{dash_id}")).with_json(body),
            callback,
        )
    }

    pub fn remove(&self, dash_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::delete(format!("/dash/{dash_id}")), None)
    }

    pub fn get_all(&self) -> Call {
        self.client.call(RequestDescriptor::get("/dash"), None)
    }

    pub fn get(&self, dash_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::get(format!("/dash/{dash_id}")), None)
    }

    pub fn handle_cli(&self, command: TimeboardCommand) -> Result<Call> {
        let call = match command {
            TimeboardCommand::Create {
                title,
                description,
                graphs,
                template_variables,
            } => {
                let graphs = json_objects(graphs, RESOURCE)?;
                let template_variables = cli_template_variables(template_variables)?;
                self.create(&title, &description, graphs, template_variables)
            }
            TimeboardCommand::Update {
                dash_id,
                title,
                description,
                graphs,
                template_variables,
            } => {
                let graphs = json_objects(graphs, RESOURCE)?;
                let template_variables = cli_template_variables(template_variables)?;
                self.update(dash_id, &title, &description, graphs, template_variables)
            }
            TimeboardCommand::Remove { dash_id } => self.remove(dash_id),
            TimeboardCommand::GetAll => self.get_all(),
            TimeboardCommand::Get { dash_id } => self.get(dash_id),
        };
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use crate::errors::DatadogError;
    use crate::request::HttpMethod;
    use serde_json::json;

    fn timeboard() -> Timeboard {
        Timeboard::new(test_client())
    }

    fn graph() -> Value {
        json!({
            "title": "Average Memory Free",
            "definition": {"events": [], "requests": [{"q": "avg:system.mem.free{*}"}]},
            "viz": "timeseries"
        })
    }

    #[test]
    fn test_create_without_template_variables() {
        let call = timeboard().create("My Dashboard", "An informative timeboard", vec![graph()], OptionalArg::Omitted);
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "/dash");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({
                "title": "My Dashboard",
                "description": "An informative timeboard",
                "graphs": [graph()]
            }))
        );
    }

    #[test]
    fn test_update_with_template_variables() {
        let call = timeboard().update(
            2473,
            "My Dashboard",
            "",
            vec![graph()],
            vec![TemplateVariable::new("host1").with_prefix("host").with_default("host:my-host")],
        );
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(descriptor.path, "/dash/2473");
        assert_eq!(
            descriptor.body.as_json().unwrap()["template_variables"],
            json!([{"name": "host1", "prefix": "host", "default": "host:my-host"}])
        );
        assert_eq!(descriptor.body.as_json().unwrap()["description"], json!(""));
    }

    #[test]
    fn test_callback_in_template_variable_slot() {
        let call = timeboard().create(
            "t",
            "d",
            vec![],
            OptionalArg::<Vec<TemplateVariable>>::callback(|_| {}),
        );
        assert!(call.has_callback());
        assert!(call.descriptor().body.as_json().unwrap().get("template_variables").is_none());
    }

    #[test]
    fn test_remove_get_all_and_get() {
        assert_eq!(timeboard().remove(1).descriptor().method, HttpMethod::Delete);
        assert_eq!(timeboard().remove(1).descriptor().path, "/dash/1");
        assert_eq!(timeboard().get_all().descriptor().path, "/dash");
        assert_eq!(timeboard().get(1).descriptor().path, "/dash/1");
    }

    #[test]
    fn test_cli_rejects_bad_tmpvars() {
        let err = run_cli(["timeboard", "create", "t", "d", "[]", "--tmpvars", "{oops"]).unwrap_err();
        assert!(matches!(err, DatadogError::Usage(_)));

        let err = run_cli(["timeboard", "create", "t", "d", "[]", "--tmpvars", "{\"name\": 3}"]).unwrap_err();
        assert!(matches!(err, DatadogError::Usage(_)));
    }

    #[test]
    fn test_cli_update_with_tmpvars() {
        let call = run_cli([
            "timeboard",
            "update",
            "2473",
            "My Dashboard",
            "",
            r#"{"title": "cpu"}"#,
            "--tmpvars",
            r#"[{"name": "host1", "prefix": "host"}]"#,
        ])
        .unwrap();
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(descriptor.path, "/dash/2473");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({
                "title": "My Dashboard",
                "description": "",
                "graphs": [{"title": "cpu"}],
                "template_variables": [{"name": "host1", "prefix": "host"}]
            }))
        );
    }
}
