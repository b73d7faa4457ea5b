use async_trait::async_trait;

use crate::clients::http::ApiClient;
use crate::error::ApiError;
use crate::models::api::ApiCliente;

#[async_trait]
pub trait ClientsApi: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<ApiCliente>, ApiError>;
}

#[async_trait]
impl ClientsApi for ApiClient {
    async fn list_clients(&self) -> Result<Vec<ApiCliente>, ApiError> {
        self.send_json(self.get("/Clientes")).await
    }
}
