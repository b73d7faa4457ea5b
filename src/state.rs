use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clients::http::ApiClient;
use crate::clients::token_store::{FileTokenStore, TokenStore};
use crate::config::Settings;
use crate::events::session::{SessionBus, SessionEvent};
use crate::service::appointment_store::AppointmentStore;
use crate::service::auth_store::AuthStore;
use crate::service::client_store::ClientStore;
use crate::service::schedules_api::SchedulesApi;

/// Everything the dashboard holds for one session.
///
/// Built once at startup and reset on logout; views receive it explicitly
/// instead of reaching for global stores.
pub struct AppState {
    pub settings: Settings,
    pub auth: AuthStore,
    pub appointments: AppointmentStore,
    pub clients: ClientStore,
    pub schedules: Arc<dyn SchedulesApi>,
    session_events: mpsc::Receiver<SessionEvent>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(settings.token_file.clone()));
        Self::with_token_store(settings, tokens)
    }

    pub fn with_token_store(settings: Settings, tokens: Arc<dyn TokenStore>) -> Self {
        let (bus, session_events) = SessionBus::new(8);
        let api = Arc::new(ApiClient::new(&settings.api_base_url, tokens.clone(), bus));
        Self {
            auth: AuthStore::new(api.clone(), tokens),
            appointments: AppointmentStore::new(api.clone(), settings.timezone),
            clients: ClientStore::new(api.clone()),
            schedules: api,
            settings,
            session_events,
        }
    }

    /// True if a 401 was seen since the last call. Marks the auth store as logged out.
    pub async fn take_session_expired(&mut self) -> bool {
        let mut expired = false;
        while let Ok(event) = self.session_events.try_recv() {
            match event {
                SessionEvent::Expired => expired = true,
            }
        }
        if expired {
            self.auth.expire().await;
        }
        expired
    }

    /// Logout point: drops the token and every cached list.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.appointments.reset().await;
        self.clients.reset().await;
    }
}
