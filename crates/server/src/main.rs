//! Denda Admin Server
//!
//! Punto de entrada del backend de administración de establecimientos.

mod config;
mod startup;

use clap::Parser;

/// CLI arguments for denda-server
#[derive(clap::Parser, Debug)]
#[command(name = "denda-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Denda Admin Server", long_about = None)]
struct Args {
    /// HTTP server port; overrides the configured value
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with the layered configuration files
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Variables del .env antes de leer la configuración
    dotenv::dotenv().ok();

    let args = Args::parse();

    let mut config = config::ServerConfig::load(&args.config_dir)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    setup_logging(args.debug, &config);

    startup::run(config).await?;

    Ok(())
}

/// Setup logging based on debug flag and configuration.
fn setup_logging(debug: bool, config: &config::ServerConfig) {
    use tracing_subscriber::EnvFilter;

    let level = if debug { "debug" } else { config.log_level.as_str() };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if config.log_json {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
