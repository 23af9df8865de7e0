use clap::Subcommand;

use crate::cli::{resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{Call, RequestDescriptor};

const RESOURCE: &str = "user";

/// `dogapi user <subcommand>`
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Invite users by email address
    Invite {
        #[arg(required = true, value_name = "ADDRESS")]
        emails: Vec<String>,
    },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Clone)]
pub struct User {
    client: RequestClient,
}

impl User {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Invite users to the organization by email
    pub fn invite<I, S>(&self, emails: I) -> Call
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let emails: Vec<String> = emails.into_iter().map(Into::into).collect();
        let body = JsonBody::new().field("emails", emails);
        self.client
            .call(RequestDescriptor::post("/invite_users").with_json(body), None)
    }

    pub fn handle_cli(&self, command: UserCommand) -> Result<Call> {
        let UserCommand::Invite { emails } = command;
        Ok(self.invite(emails))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{run_cli, test_client};
    use serde_json::json;

    #[test]
    fn test_invite() {
        let call = User::new(test_client()).invite(["test@example.com", "ops@example.com"]);
        let descriptor = call.descriptor();

        assert_eq!(descriptor.path, "/invite_users");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({"emails": ["test@example.com", "ops@example.com"]}))
        );
    }

    #[test]
    fn test_cli_invite_needs_an_address() {
        assert!(run_cli(["user", "invite"]).is_err());

        let call = run_cli(["user", "invite", "a@example.com", "b@example.com"]).unwrap();
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({"emails": ["a@example.com", "b@example.com"]}))
        );
    }
}
