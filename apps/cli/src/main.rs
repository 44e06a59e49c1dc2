//! Shopping list command line tool.

use clap::Parser;
use shop_store::SqliteShopStore;
use shopping::{BUILTIN_CATEGORIES, ShoppingService};
use shoplist::{commands::Cli, config::Config, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::debug!(database_url = %config.database_url, "Opening database");
    let store = SqliteShopStore::connect(&config.database_url).await?;
    let service = ShoppingService::new(store);

    if config.seed_on_start {
        service.seed_categories(BUILTIN_CATEGORIES).await?;
    }

    cli.execute(&service, &mut std::io::stdout()).await
}
