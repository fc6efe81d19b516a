// src/main.rs
// linkslug - AI-assisted slug generation for short links

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use linkslug::{
    config::EnvConfig,
    http::create_shared_client,
    markdown::ForwardedHeaders,
    slug::generate_slug,
    web::{self, api::validate_url, state::AppState},
};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "linkslug")]
#[command(about = "Generate short-link slugs from web pages with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Port to listen on (overrides LINKSLUG_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a slug for one URL and print the result as JSON
    Generate {
        /// Page URL
        url: String,
    },
}

async fn run_server(config: EnvConfig, port: Option<u16>) -> Result<()> {
    let state = AppState::from_config(&config, create_shared_client())?;
    let app = web::create_router(state);

    let addr = format!("{}:{}", config.host, port.unwrap_or(config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("linkslug listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_generate(config: EnvConfig, url: String) -> Result<()> {
    let url = validate_url(Some(&url))?;
    let state = AppState::from_config(&config, create_shared_client())?;

    let payload = match generate_slug(
        &url,
        state.completion.as_deref(),
        state.converter.as_deref(),
        &state.client,
        &ForwardedHeaders::new(),
        &state.settings,
    )
    .await
    {
        Ok(payload) => payload,
        Err(e) if e.is_capability_unavailable() => {
            bail!("{}: set CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN", e)
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();
    let config = EnvConfig::load();

    let default_level = match &cli.command {
        Some(Commands::Serve { .. }) | None => Level::INFO,
        Some(Commands::Generate { .. }) => Level::WARN, // Keep stdout clean
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level.unwrap_or(default_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let validation = config.validate();
    if !validation.is_valid() {
        bail!("invalid configuration\n{}", validation.report());
    }
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    info!(
        ai_enabled = config.credentials.is_enabled(),
        model = %config.ai_model,
        "Configuration loaded"
    );

    match cli.command {
        None => run_server(config, None).await,
        Some(Commands::Serve { port }) => run_server(config, port).await,
        Some(Commands::Generate { url }) => run_generate(config, url).await,
    }
}
