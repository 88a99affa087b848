use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use predicate_search::config::AppConfig;
use predicate_search::logging::init_tracing;
use predicate_search::startup::{build_router, build_state};

#[derive(Parser, Debug)]
#[command(name = "predicate-search")]
#[command(about = "Predicate editor service over a person store")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Add the sample people at startup when the store is empty
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_tracing("info");

    let mut app_config =
        if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists() {
            println!("⚠️  No config.yaml found, using default configuration:");
            println!("   - In-memory store");
            println!("   - No sample data (use --seed)\n");
            AppConfig::default_config()
        } else {
            AppConfig::load_from_file(&args.config)?
        };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }
    if args.seed {
        app_config.session.seed_samples = true;
    }

    let state = build_state(&app_config).await?;
    let app = build_router(state);

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        eprintln!("Invalid host address: {}, using 127.0.0.1", app_config.server.host);
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));

    println!("🚀 Predicate search listening on {}", addr);
    println!("   📖 Schema:    /api/schema");
    println!("   👥 Persons:   /api/persons");
    println!("   🔎 Predicate: /api/predicate");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
