#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};

use keystone_api::auth::SessionKeys;
use keystone_api::config::AppConfig;
use keystone_api::database::models::{NewUser, Role, User};
use keystone_api::database::{MemoryStore, UserStore};
use keystone_api::state::AppState;

pub const SESSION_SECRET: &str = "integration-test-secret";

/// The real router over a fresh in-memory store, on its own port.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub sessions: SessionKeys,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::development()).await
    }

    pub async fn spawn_with(mut config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        config.api.port = port;
        config.api.enable_request_logging = false;
        config.security.session_secret = SESSION_SECRET.to_string();

        let sessions = SessionKeys::new(SESSION_SECRET, config.security.session_expiry_hours)?;
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config, sessions.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, keystone_api::app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            store,
            sessions,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a user in the store and mint a session token for them.
    pub async fn user(&self, name: &str, role: Role) -> Result<(User, String)> {
        let user = self
            .store
            .create_user(NewUser {
                email: format!("{}@example.com", name.to_lowercase()),
                name: name.to_string(),
                image: None,
                role,
            })
            .await?;
        let token = self.sessions.issue(&user)?;
        Ok((user, token))
    }

    /// Mint a session token for a user the store has never seen, as the
    /// identity provider does on first sign-in.
    pub fn visitor(&self, name: &str, role: Role) -> Result<(User, String)> {
        let now = chrono::Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            image: None,
            role,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let token = self.sessions.issue(&user)?;
        Ok((user, token))
    }

    pub fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.client.get(self.url(path)), token)
    }

    pub fn post(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.client.post(self.url(path)), token)
    }

    pub fn put(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.client.put(self.url(path)), token)
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.client.delete(self.url(path)), token)
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
