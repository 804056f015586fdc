use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use linkvault::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linkvault=info,tower_http=info")),
        )
        .init();

    let args = Cli::parse();
    let pool = linkvault::db::init_pool(&args.config.database_url).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = linkvault::build_app(pool);
            let addr = args.config.socket_addr();
            let listener = TcpListener::bind(addr).await?;

            tracing::info!("LinkVault API listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Command::Import { file } => {
            let imported = cli::import_file(&pool, &file).await?;
            println!("Imported {} links", imported);
        }
    }

    Ok(())
}
