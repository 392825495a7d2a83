#![allow(dead_code)]

use std::sync::Arc;

use auth::Claims;
use auth::JwtSigner;
use auth::PasswordHasher;
use auth::TokenValidator;
use chrono::Duration;
use chrono::Utc;
use credential_service::credential::issuer::TokenIssuer;
use credential_service::credential::models::TokenResponse;
use credential_service::credential::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use credential_service::repositories::InMemoryCredentialStore;
use serde_json::json;
use uuid::Uuid;

pub const PRIVATE_KEY: &[u8] = include_bytes!("../../../auth/testdata/private_key.pem");
pub const PUBLIC_KEY: &[u8] = include_bytes!("../../../auth/testdata/public_key.pem");
pub const OTHER_PRIVATE_KEY: &[u8] =
    include_bytes!("../../../auth/testdata/other_private_key.pem");

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub signer: JwtSigner,
}

impl TestApp {
    /// Spawn the application with default token lifetimes
    pub async fn spawn() -> Self {
        Self::spawn_with_ttls(Duration::minutes(5), Duration::minutes(10)).await
    }

    /// Spawn the application in a background task with the given token lifetimes
    pub async fn spawn_with_ttls(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap Argon2 parameters keep the suite fast
        let hasher = PasswordHasher::with_params(8, 1, 1).expect("Invalid Argon2 parameters");
        let store = Arc::new(InMemoryCredentialStore::new(hasher.clone()));

        let signer = JwtSigner::from_rsa_pem(PRIVATE_KEY).expect("Invalid private key");
        let issuer = TokenIssuer::new(Arc::clone(&store), signer, access_ttl, refresh_ttl);
        let credential_service = Arc::new(CredentialService::new(store, issuer, hasher));

        let token_validator =
            Arc::new(TokenValidator::from_rsa_pem(PUBLIC_KEY).expect("Invalid public key"));

        let router = create_router(credential_service, token_validator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            signer: JwtSigner::from_rsa_pem(PRIVATE_KEY).expect("Invalid private key"),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Create an identity and assert success
    pub async fn create_user(&self, id: &Uuid, password: &str) {
        let response = self
            .put(&format!("/user/{}", id))
            .json(&json!({ "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Log in and return the issued token pair
    pub async fn login(&self, id: &Uuid, password: &str) -> TokenResponse {
        let response = self
            .post(&format!("/user/{}/login", id))
            .json(&json!({ "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse response")
    }

    /// Refresh with the given token
    pub async fn refresh(&self, id: &Uuid, refresh_token: &str) -> reqwest::Response {
        self.patch(&format!("/user/{}/refresh", id))
            .header("refresh_token", refresh_token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign an access token for `id` expiring `ttl` from now
    pub fn access_token(&self, id: &Uuid, ttl: Duration) -> String {
        let claims = Claims::new(*id, (Utc::now() + ttl).timestamp());
        self.signer.sign(&claims).expect("Failed to sign token")
    }
}
