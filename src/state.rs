use crate::client::HabitifyClient;
use crate::config::ClientConfig;
use crate::transport::CallOptions;
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<HabitifyClient>,
    pub call_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(HabitifyClient::new(config), config.timeout)
    }

    pub fn with_client(client: HabitifyClient, call_timeout: Option<Duration>) -> Self {
        Self {
            client: Arc::new(client),
            call_timeout,
        }
    }

    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            timeout: self.call_timeout,
            cancel: None,
        }
    }
}
