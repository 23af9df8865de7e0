//! One normalizer per API resource.
//!
//! Every operation takes its required arguments, then an optional slot
//! that holds either options or a completion callback, and returns a
//! [`Call`](crate::Call) built from a normalized descriptor.

pub mod comment;
pub mod downtime;
pub mod embed;
pub mod event;
pub mod graph;
pub mod host;
pub mod infrastructure;
pub mod metric;
pub mod monitor;
pub mod screenboard;
pub mod search;
pub mod service_check;
pub mod tag;
pub mod timeboard;
pub mod user;

pub use comment::{Comment, CommentProperties};
pub use downtime::{Downtime, DowntimeProperties};
pub use embed::{Embed, EmbedGetOptions, EmbedOptions};
pub use event::{Event, EventProperties, EventQueryOptions};
pub use graph::Graph;
pub use host::{Host, HostMuteOptions};
pub use infrastructure::Infrastructure;
pub use metric::{Metric, Series, SeriesOptions};
pub use monitor::{Monitor, MonitorListOptions, MonitorMuteOptions, MonitorProperties};
pub use screenboard::{Screenboard, ScreenboardOptions, TemplateVariable};
pub use search::Search;
pub use service_check::{ServiceCheck, ServiceCheckOptions};
pub use tag::{Tag, TagOptions};
pub use timeboard::Timeboard;
pub use user::User;

#[cfg(test)]
pub(crate) fn test_client() -> crate::RequestClient {
    use crate::config::{ClientConfig, ConfigUpdate};

    crate::RequestClient::new(ClientConfig::new(
        ConfigUpdate::new().with_api_key("api_key").with_app_key("app_key"),
    ))
    .unwrap()
}

#[cfg(test)]
pub(crate) fn mock_client(uri: String) -> crate::RequestClient {
    use crate::config::{ClientConfig, ConfigUpdate};

    crate::RequestClient::new(ClientConfig::new(
        ConfigUpdate::new()
            .with_api_key("api_key")
            .with_app_key("app_key")
            .with_api_host(uri),
    ))
    .unwrap()
}

/// Parse and dispatch a command line against [`test_client`]
#[cfg(test)]
pub(crate) fn run_cli<const N: usize>(args: [&str; N]) -> crate::Result<crate::Call> {
    let command = crate::cli::parse_args(args)?;
    crate::Dogapi::from_client(test_client()).handle_cli(command)
}
