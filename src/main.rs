use dotenvy::dotenv;
use std::env;
use stock_buddy::{
    bot,
    config::{database, shop, staff::StaffDirectory},
    errors::{Error, Result},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load shop settings and the staff list
    let config = shop::load_default_config()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;
    let staff = StaffDirectory::new(&config.staff);
    if staff.is_empty() {
        warn!("No staff configured; every ledger command will be refused");
    }
    info!(
        shop = %config.shop.name,
        staff = staff.len(),
        shared_inventory = config.shop.shared_inventory,
        "Configuration loaded"
    );

    // 4. Connect to the database and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, bot::BotData::new(db, staff, config.shop)).await
}
