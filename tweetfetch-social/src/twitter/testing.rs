//! In-memory transport that replays canned responses and records requests.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use tweetfetch_http::{HttpError, HttpRequest, HttpResponse, Transport};

pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, String>>>,
    seen: Mutex<Vec<HttpRequest>>,
    called: Notify,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<(u16, &str)>) -> Arc<Self> {
        Arc::new(Self::build(responses, None))
    }

    /// Like [`ScriptedTransport::new`], but every call blocks until [`Self::open_gate`].
    pub(crate) fn gated(responses: Vec<(u16, &str)>) -> Arc<Self> {
        Arc::new(Self::build(responses, Some(Semaphore::new(0))))
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        let transport = Self::build(vec![], None);
        transport
            .script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        Arc::new(transport)
    }

    fn build(responses: Vec<(u16, &str)>, gate: Option<Semaphore>) -> Self {
        let script = responses
            .into_iter()
            .map(|(status, body)| {
                Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                })
            })
            .collect();
        Self {
            script: Mutex::new(script),
            seen: Mutex::new(Vec::new()),
            called: Notify::new(),
            gate,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn request(&self, idx: usize) -> HttpRequest {
        self.seen.lock().unwrap()[idx].clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub(crate) async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.called.notified();
            if self.calls() >= n {
                return;
            }
            notified.await;
        }
    }

    pub(crate) fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.seen.lock().unwrap().push(req);
        self.called.notify_waiters();

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(message)) => Err(HttpError::Network(message)),
            None => panic!("unexpected request beyond the scripted responses"),
        }
    }
}
