//! Rell — request context resolver for the JavaScript SDK test console.
//!
//! Serves the resolved context for any combination of request parameters
//! over HTTP, so the URLs a page would emit can be inspected directly.
//!
//! Usage:
//!   rell                                  # Default port 8080
//!   rell --port 9000                      # Custom port
//!   rell --app-id 123 --locale fr_FR      # Different parser defaults
//!   rell --verbose --log-file rell.log    # Debug logging to a file

use std::path::PathBuf;

use clap::Parser;
use rell_context::{ContextParser, ParserConfig};
use rell_server::{HttpServer, ServerConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rell", about = "Rell — request context and URL synthesis")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Application id used when a request names none
    #[arg(long)]
    app_id: Option<u64>,

    /// Open graph namespace of the default application
    #[arg(long)]
    app_namespace: Option<String>,

    /// Locale used when a request names none
    #[arg(long)]
    locale: Option<String>,

    /// Allow cross-origin reads of the JSON endpoints
    #[arg(long)]
    enable_cors: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn parser_config(&self) -> ParserConfig {
        let mut config = ParserConfig::default();
        if let Some(app_id) = self.app_id {
            config.default_app_id = app_id;
        }
        if let Some(ref namespace) = self.app_namespace {
            config.app_namespace = namespace.clone();
        }
        if let Some(ref locale) = self.locale {
            config.default_locale = locale.clone();
        }
        config
    }
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if let Some(ref log_path) = cli.log_file {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match std::fs::OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .init();
                eprintln!("Logging to {}", log_path.display());
                return;
            }
            Err(e) => eprintln!("Failed to open log file {}: {e}", log_path.display()),
        }
    }

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let parser = ContextParser::new(cli.parser_config());
    let config = ServerConfig {
        port: cli.port,
        hostname: cli.hostname.clone(),
        enable_cors: cli.enable_cors,
    };

    let mut server = match HttpServer::start(config, parser).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to start server: {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("  Rell running on http://{}:{}", cli.hostname, server.port());
    println!();
    println!("  GET  /context?server=beta&view-mode=canvas&path=/examples/");
    println!("  POST /context            (form-encoded context values)");
    println!("  GET  /environments?path=/examples/");
    println!("  GET  /health");
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    let _ = tokio::signal::ctrl_c().await;

    println!();
    println!("  Shutting down...");
    server.stop().await;
}
