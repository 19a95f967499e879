use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use serde_json::json;
use serde_json::Value;
use shop_api::domain::user::models::NewUser;
use shop_api::domain::user::models::User;
use shop_api::domain::user::models::UserId;
use shop_api::domain::user::ports::UserRepository;
use shop_api::domain::user::service::UserService;
use shop_api::inbound::http::router::create_router;
use shop_api::outbound::repositories::InMemoryUserRepository;
use shop_api::user::errors::UserError;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application on an empty in-memory store
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryUserRepository::new());
        let address = spawn_server(Arc::clone(&repository)).await;

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            authenticator: Arc::new(Authenticator::new(JWT_SECRET, 24)),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/register")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the issued token
    pub async fn token_for(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }
}

/// Bind a random port, serve the router backed by `repository` and return its base URL
pub async fn spawn_server<R: UserRepository>(repository: Arc<R>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let authenticator = Arc::new(Authenticator::new(JWT_SECRET, 24));
    let user_service = Arc::new(UserService::new(repository, Arc::clone(&authenticator)));
    let router = create_router(user_service, authenticator);

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    format!("http://127.0.0.1:{}", port)
}

/// Credential store whose backend is permanently unreachable
pub struct UnreachableRepository;

#[async_trait]
impl UserRepository for UnreachableRepository {
    async fn create(&self, _user: NewUser) -> Result<User, UserError> {
        Err(UserError::StoreUnavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserError> {
        Err(UserError::StoreUnavailable("connection refused".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserError> {
        Err(UserError::StoreUnavailable("connection refused".to_string()))
    }

    async fn delete_all(&self) -> Result<u64, UserError> {
        Err(UserError::StoreUnavailable("connection refused".to_string()))
    }
}

/// Throwaway PostgreSQL database with migrations applied.
///
/// Connects through `DATABASE__URL`; tests skip when it is not set.
pub struct TestDb {
    pub pool: PgPool,
    server_url: String,
    db_name: String,
}

impl TestDb {
    pub async fn new() -> Option<Self> {
        let server_url = std::env::var("DATABASE__URL").ok()?;
        let db_name = format!(
            "test_shop_api_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE__URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            server_url,
            db_name,
        })
    }

    /// Close the pool and drop the database.
    pub async fn cleanup(self) {
        self.pool.close().await;

        if let Ok(mut conn) = PgConnection::connect(&self.server_url).await {
            let _ = conn
                .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.db_name).as_str())
                .await;
        }
    }
}
