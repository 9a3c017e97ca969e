use crate::errors::ClientError;
use crate::transport::{ApiRequest, RawResponse, Transport};
use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex, time::Duration};

/// Replays queued outcomes in order and records every request it is handed.
#[derive(Default)]
pub struct StubTransport {
    outcomes: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn fail(self, err: ClientError) -> Self {
        self.push(Err(err))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, outcome: Result<RawResponse, ClientError>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::connection("no stubbed response left")))
    }
}
