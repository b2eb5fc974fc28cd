//! Game service entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use daedalus::config::ConfigLoader;
use daedalus::server::Server;
use daedalus::telemetry::init_logging;
use game_service::{app, GameStore, VERSION};

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("game-service {VERSION}");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(2);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"Game service - in-memory game records over HTTP

USAGE:
    game-service [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    DAEDALUS__SERVER__HTTP_ADDR              Listen address (default: 0.0.0.0:8080)
    DAEDALUS__SERVER__SHUTDOWN_TIMEOUT_SECS  Drain timeout on shutdown (default: 30)
    DAEDALUS__SERVER__REQUEST_TIMEOUT_MS     Body read timeout (default: 30000)
    DAEDALUS__SERVER__MAX_BODY_BYTES         Largest request body (default: 1048576)
    DAEDALUS__LOGGING__LEVEL                 Log filter (default: info)
    DAEDALUS__LOGGING__FORMAT                json, pretty or compact (default: json)
    RUST_LOG                                 Overrides the configured log filter
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_dotenv()?;
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    let config = loader.load().context("invalid configuration")?;

    init_logging(&config.logging.to_log_config())?;

    let server_config = config.server.to_server_config();
    info!(
        version = VERSION,
        http_addr = server_config.http_addr(),
        "starting game service"
    );

    let application = app(Arc::new(GameStore::new()))?;
    Server::new(server_config, application).run().await?;

    info!("game service stopped");
    Ok(())
}
