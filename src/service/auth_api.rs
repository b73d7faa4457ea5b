use async_trait::async_trait;
use reqwest::StatusCode;

use crate::clients::http::{ApiClient, decode_body, server_message};
use crate::error::{ApiError, LoginError};
use crate::models::api::{ApiDecodeTokenResponse, ApiLoginResponse, LoginRequest};

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Never goes through the 401 handler; failures map to [`LoginError`].
    async fn login(&self, usuario: &str, password: &str) -> Result<ApiLoginResponse, LoginError>;
    async fn decode_token(&self) -> Result<ApiDecodeTokenResponse, ApiError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, usuario: &str, password: &str) -> Result<ApiLoginResponse, LoginError> {
        let body = LoginRequest {
            usuario: usuario.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send_unauthenticated(self.post("/auth/login").json(&body))
            .await
            .map_err(|_| LoginError::Connection)?;

        let status = response.status();
        if status.is_success() {
            return decode_body(response).await.map_err(|_| LoginError::Unknown);
        }
        let text = response.text().await.unwrap_or_default();
        Err(login_error(status, &text))
    }

    async fn decode_token(&self) -> Result<ApiDecodeTokenResponse, ApiError> {
        self.send_json(self.get("/auth/decode-token")).await
    }
}

pub fn login_error(status: StatusCode, body: &str) -> LoginError {
    match status.as_u16() {
        401 => LoginError::InvalidCredentials,
        400 => LoginError::InvalidInput,
        code if code >= 500 => LoginError::Server,
        _ => {
            let message = server_message(body);
            if message.is_empty() {
                LoginError::Rejected("Error al iniciar sesión".to_string())
            } else {
                LoginError::Rejected(message)
            }
        }
    }
}
