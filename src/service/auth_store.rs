use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::clients::token_store::TokenStore;
use crate::error::ApiError;
use crate::models::user::User;
use crate::service::auth_api::AuthApi;

pub const ERR_BAD_CREDENTIALS: &str = "Credenciales incorrectas";
pub const ERR_CONNECT: &str = "Error al conectar con el servidor";

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    state: Mutex<AuthState>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.lock().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated
    }

    /// Logs in, persists the token and loads the user behind it.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.error = None;
        }

        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Login failed for {}: {:?}", username, err);
                return self.fail(err.to_string()).await;
            }
        };

        let token = response.token.as_deref().unwrap_or_default();
        if response.status != "200" || token.is_empty() {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(ERR_BAD_CREDENTIALS.to_string());
            return self.fail(message).await;
        }

        if let Err(err) = self.tokens.save(token) {
            error!("Could not persist auth token: {}", err);
            return self.fail(ERR_CONNECT.to_string()).await;
        }

        match self.load_user().await {
            Ok(user) => {
                info!("Logged in as {}", user.login);
                let mut state = self.state.lock().await;
                state.user = Some(user);
                state.is_authenticated = true;
                state.is_loading = false;
                true
            }
            Err(_) => {
                self.tokens.clear();
                self.fail(ERR_CONNECT.to_string()).await
            }
        }
    }

    /// Rebuilds the session from a persisted token, if there is one.
    ///
    /// A rejected token (401) is simply no session; any other failure records
    /// [`ERR_CONNECT`] and keeps the token for the next attempt.
    pub async fn restore(&self) -> bool {
        if self.tokens.load().is_none() {
            return false;
        }
        match self.load_user().await {
            Ok(user) => {
                let mut state = self.state.lock().await;
                state.user = Some(user);
                state.is_authenticated = true;
                state.error = None;
                true
            }
            Err(ApiError::Unauthorized) => false,
            Err(_) => self.fail(ERR_CONNECT.to_string()).await,
        }
    }

    pub async fn logout(&self) {
        self.tokens.clear();
        let mut state = self.state.lock().await;
        state.user = None;
        state.is_authenticated = false;
        state.error = None;
    }

    /// Marks the session as gone after the service answered 401.
    pub async fn expire(&self) {
        let mut state = self.state.lock().await;
        state.user = None;
        state.is_authenticated = false;
    }

    async fn load_user(&self) -> Result<User, ApiError> {
        let decoded = self.api.decode_token().await.inspect_err(|err| {
            error!("Error decoding token: {}", err);
        })?;
        User::from_decoded(&decoded).inspect_err(|err| {
            error!("Unexpected decode-token payload: {}", err);
        })
    }

    async fn fail(&self, message: String) -> bool {
        let mut state = self.state.lock().await;
        state.is_loading = false;
        state.error = Some(message);
        false
    }
}
