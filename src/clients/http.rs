use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::clients::token_store::TokenStore;
use crate::error::ApiError;
use crate::events::session::{SessionBus, SessionEvent};

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

/// Thin wrapper over `reqwest` for the scheduling service.
///
/// Every request built through [`ApiClient::send`] carries the stored bearer
/// token. A 401 drops the token and emits [`SessionEvent::Expired`], which is
/// how the front end learns it has to log in again.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    session: SessionBus,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>, session: SessionBus) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            tokens,
            session,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Sends an authenticated request and maps non-2xx responses to [`ApiError`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let builder = match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        debug!("Scheduling API responded {} for {}", status, response.url());

        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401 from scheduling API, clearing stored token");
            self.tokens.clear();
            self.session.emit(SessionEvent::Expired);
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(&text),
            });
        }
        Ok(response)
    }

    /// Like [`ApiClient::send`], then decodes the JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        decode_body(response).await
    }

    /// Sends without the bearer token and without the 401 handler.
    pub async fn send_unauthenticated(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        builder.send().await
    }
}

pub(crate) async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await.map_err(ApiError::Network)?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::Decode(format!("{}; raw body: {}", e, text)))
}

/// Pulls `message` out of a JSON error body, falling back to the raw text.
pub(crate) fn server_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { message: Some(message) }) if !message.trim().is_empty() => message,
        _ => body.trim().to_string(),
    }
}
