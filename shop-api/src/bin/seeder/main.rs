use anyhow::Context;
use auth::PasswordHasher;
use clap::Parser;
use shop_api::config::Config;
use shop_api::domain::user::ports::UserRepository;
use shop_api::outbound::repositories::PostgresUserRepository;
use shop_api::seed;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "seeder", about = "Import or remove the sample user accounts")]
struct Args {
    #[arg(short, long, help = "Delete all users instead of importing")]
    destroy: bool,

    #[arg(long, env = "DATABASE__URL", help = "PostgreSQL URL (overrides configuration)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_api=info,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    let url = args
        .database_url
        .or(config.database.url)
        .context("The seeder needs a PostgreSQL database; set DATABASE__URL")?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&url)
        .await?;
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let repository = PostgresUserRepository::new(pg_pool);

    if args.destroy {
        let deleted = repository.delete_all().await?;
        tracing::info!(deleted, "Data destroyed");
    } else {
        let users = seed::sample_users(&PasswordHasher::new())?;
        let imported = seed::import(&repository, users).await?;
        tracing::info!(imported, "Data imported");
    }

    Ok(())
}
