mod common;

use std::sync::Arc;

use auth::JwtSigner;
use auth::PasswordHasher;
use chrono::Duration;
use common::PRIVATE_KEY;
use credential_service::credential::errors::CredentialError;
use credential_service::credential::issuer::TokenIssuer;
use credential_service::credential::models::BootstrapUser;
use credential_service::credential::models::Password;
use credential_service::credential::models::UserId;
use credential_service::credential::ports::CredentialServicePort;
use credential_service::credential::ports::CredentialStore;
use credential_service::credential::service::CredentialService;
use credential_service::repositories::InMemoryCredentialStore;
use credential_service::repositories::SqliteCredentialStore;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

fn hasher() -> PasswordHasher {
    PasswordHasher::with_params(8, 1, 1).unwrap()
}

fn service(refresh_ttl: Duration) -> Arc<CredentialService<InMemoryCredentialStore>> {
    service_with_store(
        Arc::new(InMemoryCredentialStore::new(hasher())),
        refresh_ttl,
    )
}

fn service_with_store<S: CredentialStore>(
    store: Arc<S>,
    refresh_ttl: Duration,
) -> Arc<CredentialService<S>> {
    let signer = JwtSigner::from_rsa_pem(PRIVATE_KEY).unwrap();
    let issuer = TokenIssuer::new(
        Arc::clone(&store),
        signer,
        Duration::minutes(5),
        refresh_ttl,
    );
    Arc::new(CredentialService::new(store, issuer, hasher()))
}

fn password(value: &str) -> Password {
    Password::new(value.to_string()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_has_single_winner() {
    let service = service(Duration::minutes(10));
    let id = UserId::new();
    service.create_user(&id, &password("pw1")).await.unwrap();
    let tokens = service.login_user(&id, &password("pw1")).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let presented = tokens.refresh_token.clone();
            tokio::spawn(async move { service.refresh_token(&id, &presented).await })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(response) => winners.push(response),
            Err(e) => assert_eq!(e, CredentialError::Unauthorized),
        }
    }

    assert_eq!(winners.len(), 1);

    // Only the winner's token is current
    let winner = &winners[0];
    assert!(service.refresh_token(&id, &winner.refresh_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_has_single_winner_on_sqlite() {
    let path = std::env::temp_dir().join(format!("credentials-{}.db", Uuid::new_v4()));
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to open SQLite database");
    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let store = Arc::new(SqliteCredentialStore::new(pool.clone(), hasher()));
    let service = service_with_store(store, Duration::minutes(10));

    let id = UserId::new();
    service.create_user(&id, &password("pw1")).await.unwrap();

    for _ in 0..30 {
        let tokens = service.login_user(&id, &password("pw1")).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                let presented = tokens.refresh_token.clone();
                tokio::spawn(async move { service.refresh_token(&id, &presented).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert_eq!(e, CredentialError::Unauthorized),
            }
        }
        assert_eq!(winners, 1);
    }

    pool.close().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_zero_ttl_refresh_token_is_unusable() {
    let service = service(Duration::zero());
    let id = UserId::new();
    service.create_user(&id, &password("pw1")).await.unwrap();
    let tokens = service.login_user(&id, &password("pw1")).await.unwrap();

    assert_eq!(
        service.refresh_token(&id, &tokens.refresh_token).await,
        Err(CredentialError::Unauthorized)
    );
}

#[tokio::test]
async fn test_bootstrap_is_repeatable() {
    let service = service(Duration::minutes(10));
    let kept = UserId::new();
    let dropped = UserId::new();

    let users = vec![
        BootstrapUser {
            id: kept,
            password: password("someSecretPassword"),
        },
        BootstrapUser {
            id: dropped,
            password: password("someOtherPassword"),
        },
    ];
    service.bootstrap(&users).await.unwrap();
    service.bootstrap(&users).await.unwrap();

    service.bootstrap(&users[..1]).await.unwrap();

    assert!(service
        .login_user(&kept, &password("someSecretPassword"))
        .await
        .is_ok());
    assert_eq!(
        service
            .login_user(&dropped, &password("someOtherPassword"))
            .await,
        Err(CredentialError::Unauthorized)
    );
}

#[tokio::test]
async fn test_bootstrap_does_not_touch_regular_identities() {
    let service = service(Duration::minutes(10));
    let regular = UserId::new();
    service.create_user(&regular, &password("pw1")).await.unwrap();

    service.bootstrap(&[]).await.unwrap();

    assert!(service.login_user(&regular, &password("pw1")).await.is_ok());
}

#[tokio::test]
async fn test_bootstrap_conflict_aborts() {
    let service = service(Duration::minutes(10));
    let id = UserId::new();
    service.create_user(&id, &password("pw1")).await.unwrap();

    let users = vec![BootstrapUser {
        id,
        password: password("different"),
    }];

    assert_eq!(
        service.bootstrap(&users).await,
        Err(CredentialError::Conflict)
    );
}
