use clap::Parser;
use dogapi::{CliCommand, ConfigUpdate};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dogapi", version, about = "Datadog API command-line client")]
struct Cli {
    /// Datadog API key.
    #[arg(long, global = true, env = "DATADOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Datadog application key.
    #[arg(long, global = true, env = "DATADOG_APP_KEY", hide_env_values = true)]
    app_key: Option<String>,

    /// API host, e.g. app.datadoghq.eu.
    #[arg(long, global = true, env = "DATADOG_HOST")]
    api_host: Option<String>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("dogapi=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dogapi=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut update = ConfigUpdate::new();
    update.api_key = cli.api_key;
    update.app_key = cli.app_key;
    update.api_host = cli.api_host;
    if let Err(err) = dogapi::initialize(update) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    debug!(command = ?cli.command, "Dispatching command");
    let call = match dogapi::default_client().and_then(|dogapi| dogapi.handle_cli(cli.command)) {
        Ok(call) => call,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match call.await {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{value}"),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
