use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use crate::models::api::ApiCliente;
use crate::service::clients_api::ClientsApi;

pub const ERR_FETCH_CLIENTS: &str = "Error al cargar los clientes";

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub clients: Vec<ApiCliente>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Patient directory used to prefill the create form.
pub struct ClientStore {
    api: Arc<dyn ClientsApi>,
    state: Mutex<ClientState>,
}

impl ClientStore {
    pub fn new(api: Arc<dyn ClientsApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ClientState::default()),
        }
    }

    pub async fn snapshot(&self) -> ClientState {
        self.state.lock().await.clone()
    }

    pub async fn clients(&self) -> Vec<ApiCliente> {
        self.state.lock().await.clients.clone()
    }

    pub async fn fetch_clients(&self) -> bool {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.error = None;
        }
        let result = self.api.list_clients().await;
        let mut state = self.state.lock().await;
        state.is_loading = false;
        match result {
            Ok(clients) => {
                state.clients = clients;
                true
            }
            Err(err) => {
                error!("Error fetching clients: {}", err);
                state.error = Some(ERR_FETCH_CLIENTS.to_string());
                false
            }
        }
    }

    pub async fn find_by_phone(&self, celular: &str) -> Option<ApiCliente> {
        let state = self.state.lock().await;
        state
            .clients
            .iter()
            .find(|client| client.celular == celular.trim())
            .cloned()
    }

    pub async fn reset(&self) {
        *self.state.lock().await = ClientState::default();
    }
}
