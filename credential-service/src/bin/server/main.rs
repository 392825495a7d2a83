use std::sync::Arc;

use auth::JwtSigner;
use auth::PasswordHasher;
use auth::TokenValidator;
use chrono::Duration;
use credential_service::config::Config;
use credential_service::config::DatabaseBackend;
use credential_service::credential::issuer::TokenIssuer;
use credential_service::credential::models::BootstrapUser;
use credential_service::credential::models::Password;
use credential_service::credential::models::UserId;
use credential_service::credential::ports::CredentialServicePort;
use credential_service::credential::ports::CredentialStore;
use credential_service::credential::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use credential_service::repositories::InMemoryCredentialStore;
use credential_service::repositories::PostgresCredentialStore;
use credential_service::repositories::SqliteCredentialStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        access_token_ttl_seconds = config.jwt.access_token_ttl_seconds,
        refresh_token_ttl_seconds = config.jwt.refresh_token_ttl_seconds,
        bootstrap_users = config.bootstrap.users.len(),
        "Configuration loaded"
    );

    let signer = JwtSigner::from_rsa_pem(&std::fs::read(&config.jwt.private_key_path)?)?;
    let token_validator = Arc::new(TokenValidator::from_rsa_pem(&std::fs::read(
        &config.jwt.public_key_path,
    )?)?);
    tracing::info!(
        private_key = %config.jwt.private_key_path,
        public_key = %config.jwt.public_key_path,
        "Signing keys loaded"
    );

    let hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let credential_service: Arc<dyn CredentialServicePort> = match config.database.backend {
        DatabaseBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations/postgres").run(&pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresCredentialStore::new(pool, hasher.clone()));
            build_service(store, signer, hasher, &config)
        }
        DatabaseBackend::Sqlite => {
            let pool = SqlitePoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "sqlite",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations/sqlite").run(&pool).await?;
            tracing::info!(database = "sqlite", "Database migrations completed");

            let store = Arc::new(SqliteCredentialStore::new(pool, hasher.clone()));
            build_service(store, signer, hasher, &config)
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory credential store; identities are lost on restart");

            let store = Arc::new(InMemoryCredentialStore::new(hasher.clone()));
            build_service(store, signer, hasher, &config)
        }
    };

    let bootstrap_users = config
        .bootstrap
        .users
        .iter()
        .map(|user| {
            Ok(BootstrapUser {
                id: UserId(user.id),
                password: Password::new(user.password.clone())?,
            })
        })
        .collect::<Result<Vec<_>, anyhow::Error>>()?;
    credential_service.bootstrap(&bootstrap_users).await?;

    let http_address = format!("{}:{}", config.server.address, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, token_validator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

fn build_service<S>(
    store: Arc<S>,
    signer: JwtSigner,
    hasher: PasswordHasher,
    config: &Config,
) -> Arc<dyn CredentialServicePort>
where
    S: CredentialStore,
{
    let issuer = TokenIssuer::new(
        Arc::clone(&store),
        signer,
        Duration::seconds(config.jwt.access_token_ttl_seconds),
        Duration::seconds(config.jwt.refresh_token_ttl_seconds),
    );

    Arc::new(CredentialService::new(store, issuer, hasher))
}
