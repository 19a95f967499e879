use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use shop_api::config::Config;
use shop_api::domain::user::ports::UserRepository;
use shop_api::domain::user::ports::UserServicePort;
use shop_api::domain::user::service::UserService;
use shop_api::inbound::http::router::create_router;
use shop_api::outbound::repositories::InMemoryUserRepository;
use shop_api::outbound::repositories::PostgresUserRepository;
use shop_api::seed;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        store = if config.database.url.is_some() { "postgresql" } else { "memory" },
        seed_on_startup = config.seed.on_startup,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));
    tracing::info!(
        token_lifetime_hours = authenticator.token_lifetime_hours(),
        "Authenticator ready"
    );

    let user_service: Arc<dyn UserServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
            seed_on_startup(&config, user_repository.as_ref()).await?;
            Arc::new(UserService::new(user_repository, Arc::clone(&authenticator)))
        }
        None => {
            tracing::warn!("No database URL configured, users are kept in memory");

            let user_repository = Arc::new(InMemoryUserRepository::new());
            seed_on_startup(&config, user_repository.as_ref()).await?;
            Arc::new(UserService::new(user_repository, Arc::clone(&authenticator)))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn seed_on_startup<R: UserRepository>(
    config: &Config,
    repository: &R,
) -> Result<(), anyhow::Error> {
    if !config.seed.on_startup {
        return Ok(());
    }

    let users = seed::sample_users(&PasswordHasher::new())?;
    let imported = seed::import(repository, users).await?;
    tracing::info!(imported, "Sample users imported");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
