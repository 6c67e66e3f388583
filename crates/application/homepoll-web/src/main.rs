//! homepoll survey server.
//!
//! ## Usage
//!
//! ```bash
//! homepoll-web                          # 127.0.0.1:3000, in-memory store
//! homepoll-web --port 8080              # custom port
//! homepoll-web --config homepoll.yaml   # explicit config file
//! ```

use homepoll_config::Config;
use homepoll_web::{routes, serve, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homepoll_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut host_override: Option<String> = None;
    let mut port_override: Option<u16> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host_override = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port_override = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" => {
                println!(
                    r#"
homepoll survey server

USAGE:
    homepoll-web [OPTIONS]

OPTIONS:
    -h, --host <HOST>      Host to bind to [default: 127.0.0.1]
    -p, --port <PORT>      Port to listen on [default: 3000]
    -c, --config <FILE>    Config file (YAML)
    --help                 Print help information
"#
                );
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = Config::load(config_path.as_deref())?;
    if let Some(host) = host_override {
        config.server.host = host;
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    println!("homepoll — price-opinion survey for {}", config.survey.property_label);
    println!("store backend: {:?}", config.store.backend);

    routes::print_routes();

    let state = Arc::new(AppState::from_config(config)?);

    println!("Server ready at http://{}", addr);
    serve(state, &addr).await?;

    Ok(())
}
