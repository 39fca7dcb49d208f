// Identity store: who is signed in to the current session
// Authentication goes through a pluggable async backend; the store only records the outcome

use crate::ids::generate_id;
use crate::observer::{Observers, SubscriptionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=150";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authentication backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    fn apply_to(self, identity: &mut Identity) {
        if let Some(name) = self.name {
            identity.name = name;
        }
        if let Some(email) = self.email {
            identity.email = email;
        }
        if let Some(phone) = self.phone {
            identity.phone = Some(phone);
        }
        if let Some(avatar) = self.avatar {
            identity.avatar = Some(avatar);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl AuthState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

// Authentication backend trait; a real implementation would talk to an identity service
#[async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn login_with_social(&self, provider: &str) -> Result<Identity, AuthError>;

    async fn register(&self, registration: Registration) -> Result<Identity, AuthError>;
}

/// Backend that accepts every request after a fixed delay.
///
/// Identities are synthetic: login binds a fixed guest profile to the given
/// email, social login derives name and email from the provider, and
/// registration echoes the submitted details under a fresh id.
pub struct MockAuthBackend {
    latency: Duration,
}

impl MockAuthBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.simulate_latency().await;

        Ok(Identity {
            id: "user-123".to_string(),
            name: "Guest User".to_string(),
            email: email.to_string(),
            phone: None,
            avatar: Some(DEFAULT_AVATAR_URL.to_string()),
        })
    }

    async fn login_with_social(&self, provider: &str) -> Result<Identity, AuthError> {
        self.simulate_latency().await;

        let slug = provider.to_lowercase();
        Ok(Identity {
            id: format!("user-social-{}", slug),
            name: format!("{} User", provider),
            email: format!("user@{}.com", slug),
            phone: None,
            avatar: Some(DEFAULT_AVATAR_URL.to_string()),
        })
    }

    async fn register(&self, registration: Registration) -> Result<Identity, AuthError> {
        self.simulate_latency().await;

        Ok(Identity {
            id: generate_id("user-new"),
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            avatar: Some(DEFAULT_AVATAR_URL.to_string()),
        })
    }
}

pub struct IdentityStore {
    backend: Arc<dyn AuthBackend>,
    state: RwLock<Arc<AuthState>>,
    observers: Observers<AuthState>,
}

impl IdentityStore {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(Arc::new(AuthState::Anonymous)),
            observers: Observers::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<AuthState> {
        Arc::clone(&self.state.read())
    }

    pub fn current(&self) -> Option<Identity> {
        self.state.read().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<AuthState>) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self.backend.login(email, password).await?;
        info!("Signed in {} ({})", identity.email, identity.id);
        self.authenticate(identity.clone());
        Ok(identity)
    }

    pub async fn login_with_social(&self, provider: &str) -> Result<Identity, AuthError> {
        let identity = self.backend.login_with_social(provider).await?;
        info!("Signed in {} via {}", identity.email, provider);
        self.authenticate(identity.clone());
        Ok(identity)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: phone.map(str::to_string),
        };
        let identity = self.backend.register(registration).await?;
        info!("Registered {} ({})", identity.email, identity.id);
        self.authenticate(identity.clone());
        Ok(identity)
    }

    pub fn logout(&self) {
        let changed = self.mutate(|state| {
            if !state.is_authenticated() {
                return false;
            }
            *state = AuthState::Anonymous;
            true
        });
        if changed {
            info!("Signed out");
        }
    }

    /// Merges `update` into the signed-in identity.
    ///
    /// Returns false, without notifying, while no one is signed in or when
    /// the update leaves the identity as it was.
    pub fn update_profile(&self, update: ProfileUpdate) -> bool {
        let changed = self.mutate(|state| {
            let current = match state.identity() {
                Some(identity) => identity,
                None => {
                    debug!("Ignoring profile update for anonymous session");
                    return false;
                }
            };
            let mut identity = current.clone();
            update.apply_to(&mut identity);
            if identity == *current {
                return false;
            }
            *state = AuthState::Authenticated(identity);
            true
        });
        if changed {
            debug!("Profile updated");
        }
        changed
    }

    fn authenticate(&self, identity: Identity) {
        self.mutate(|state| {
            *state = AuthState::Authenticated(identity);
            true
        });
    }

    // Same publish-then-flush sequence as the other stores
    fn mutate<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut AuthState) -> bool,
    {
        {
            let mut state = self.state.write();
            let mut next = AuthState::clone(&state);
            if !change(&mut next) {
                return false;
            }
            *state = Arc::new(next);
            self.observers.enqueue(Arc::clone(&state));
        }
        self.observers.flush();
        true
    }
}
