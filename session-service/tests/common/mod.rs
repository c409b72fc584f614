use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenConfig;
use session_service::domain::session::errors::CredentialStoreError;
use session_service::domain::session::models::User;
use session_service::domain::session::models::UserId;
use session_service::domain::session::models::Username;
use session_service::domain::session::ports::CredentialStore;
use session_service::domain::session::service::SessionService;
use session_service::inbound::http::router::create_router;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-for-jwt-signing-32-bytes";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-for-jwt-signing-32-bytes";

/// Credential store kept in memory so tests can change records mid-session
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<i64, User>>,
}

impl InMemoryCredentialStore {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.0, user);
    }

    pub fn set_role(&self, id: i64, role: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.role = role.to_string();
        }
    }

    pub fn remove(&self, id: i64) {
        self.users.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryCredentialStore>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with a seeded `admin`/`admin` account (id 1)
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let codec = TokenCodec::new(&TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET))
            .expect("Failed to build token codec");
        let hasher = PasswordHasher::with_cost(1024, 1, 1).expect("Failed to build hasher");
        let authenticator = Arc::new(Authenticator::new(codec, hasher));

        let store = Arc::new(InMemoryCredentialStore::default());
        store.insert(User {
            id: UserId(1),
            username: Username::new("admin".to_string()).unwrap(),
            password_hash: authenticator.hash_password("admin").unwrap(),
            role: "admin".to_string(),
        });

        let session_service = Arc::new(SessionService::new(
            Arc::clone(&store),
            Arc::clone(&authenticator),
            Duration::from_secs(1),
        ));

        let router = create_router(session_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            authenticator,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Log in and return the response body
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
