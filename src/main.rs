use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use webdigest::{api::routes::create_router, cli, config::Config, AppState};

#[derive(Parser)]
#[command(
    name = "webdigest",
    about = "Crawl a web page and analyze its content with the DeepSeek API"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve,
    /// Interactive prompt loop (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Cli::parse();
    let config = Config::load()?;

    match args.command.unwrap_or(Command::Interactive) {
        Command::Serve => serve(config).await,
        Command::Interactive => {
            cli::run_interactive(&config).await?;
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server_addr = config.server_addr;
    let app_state = AppState {
        config: Arc::new(config),
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
