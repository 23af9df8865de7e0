use std::fmt::Display;

use clap::Subcommand;

use crate::cli::{resource_help, resource_usage};
use crate::client::RequestClient;
use crate::errors::Result;
use crate::normalize::JsonBody;
use crate::request::{resolve_optional_args, Call, OptionalArg, RequestDescriptor};

const RESOURCE: &str = "comment";

/// `dogapi comment <subcommand>`
#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    /// Add a new comment
    Create {
        message: String,
        /// Handle to associate with the comment, e.g. "user@domain.com"
        #[arg(long)]
        handle: Option<String>,
        /// Event to associate the comment with
        #[arg(long = "event", value_name = "EVENT_ID")]
        event_id: Option<i64>,
    },
    /// Update an existing comment
    Update {
        comment_id: String,
        message: String,
        #[arg(long)]
        handle: Option<String>,
    },
    /// Delete a comment
    Remove { comment_id: String },
}

pub fn usage() -> String {
    resource_usage(RESOURCE).unwrap_or_default()
}

pub fn help() -> String {
    resource_help(RESOURCE).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentProperties {
    /// Handle to post as, e.g. `user@domain.com`
    pub handle: Option<String>,
    /// Event to attach the comment to
    pub related_event_id: Option<i64>,
}

/// Comment endpoints
#[derive(Clone)]
pub struct Comment {
    client: RequestClient,
}

impl Comment {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn create(&self, message: &str, properties: impl Into<OptionalArg<CommentProperties>>) -> Call {
        let (properties, callback) =
            resolve_optional_args(properties.into(), CommentProperties::default());
        let body = JsonBody::new()
            .field("message", message)
            .present("handle", properties.handle)
            .present("related_event_id", properties.related_event_id);
        self.client
            .call(RequestDescriptor::post("/comments").with_json(body), callback)
    }

    pub fn update(
        &self,
        comment_id: impl Display,
        message: &str,
        handle: impl Into<OptionalArg<String>>,
    ) -> Call {
        let (handle, callback) =
            resolve_optional_args(Into::<OptionalArg<_>>::into(handle).map(Some), None);
        let body = JsonBody::new()
            .field("message", message)
            .present("handle", handle);
        self.client.call(
            RequestDescriptor::put(format!("/comments/{comment_id}")).with_json(body),
            callback,
        )
    }

    pub fn remove(&self, comment_id: impl Display) -> Call {
        self.client
            .call(RequestDescriptor::delete(format!("/comments/{comment_id}")), None)
    }

    pub fn handle_cli(&self, command: CommentCommand) -> Result<Call> {
        let call = match command {
            CommentCommand::Create {
                message,
                handle,
                event_id,
            } => {
                let properties = CommentProperties {
                    handle,
                    related_event_id: event_id,
                };
                self.create(&message, properties)
            }
            CommentCommand::Update {
                comment_id,
                message,
                handle,
            } => match handle {
                Some(handle) => self.update(comment_id, &message, handle),
                None => self.update(comment_id, &message, OptionalArg::Omitted),
            },
            CommentCommand::Remove { comment_id } => self.remove(comment_id),
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

    fn comment() -> Comment {
        Comment::new(test_client())
    }

    #[test]
    fn test_create_with_properties() {
        let call = comment().create(
            "a comment",
            CommentProperties {
                handle: Some("user@domain.com".to_string()),
                related_event_id: Some(0),
            },
        );
        let descriptor = call.descriptor();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "/comments");
        assert_eq!(
            descriptor.body.as_json(),
            Some(&json!({"message": "a comment", "handle": "user@domain.com", "related_event_id": 0}))
        );
    }

    #[test]
    fn test_create_message_only() {
        let call = comment().create("hello", OptionalArg::Omitted);
        assert_eq!(call.descriptor().body.as_json(), Some(&json!({"message": "hello"})));
    }

    #[test]
    fn test_update_and_remove_paths() {
        let update = comment().update(1234, "edited", OptionalArg::Omitted);
        assert_eq!(update.descriptor().method, HttpMethod::Put);
        assert_eq!(update.descriptor().path, "/comments/1234");
        assert_eq!(update.descriptor().body.as_json(), Some(&json!({"message": "edited"})));

        let remove = comment().remove(1234);
        assert_eq!(remove.descriptor().method, HttpMethod::Delete);
        assert_eq!(remove.descriptor().path, "/comments/1234");
    }

    #[test]
    fn test_cli_update_with_handle() {
        let call = run_cli(["comment", "update", "77", "new text", "--handle", "ops@example.com"]).unwrap();
        assert_eq!(call.descriptor().path, "/comments/77");
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({"message": "new text", "handle": "ops@example.com"}))
        );
    }

    #[test]
    fn test_cli_create_with_event() {
        let call = run_cli(["comment", "create", "hello", "--event", "1234"]).unwrap();
        assert_eq!(
            call.descriptor().body.as_json(),
            Some(&json!({"message": "hello", "related_event_id": 1234}))
        );
    }

    #[test]
    fn test_cli_rejects_non_numeric_event() {
        let err = run_cli(["comment", "create", "hello", "--event", "latest"]).unwrap_err();
        assert!(matches!(err, DatadogError::Usage(_)));
    }
}
