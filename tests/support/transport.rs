//! In-memory bot transport.

use std::collections::VecDeque;
use std::sync::Arc;

use botdeck::error::RemoteCallError;
use botdeck::port::outbound::bot::{BotRequest, BotTransport};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<BotRequest>>,
    replies: Mutex<VecDeque<Result<Value, RemoteCallError>>>,
}

/// Records every request and replays queued replies; `null` once empty.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Inner>,
}

impl RecordingTransport {
    pub fn new(replies: impl IntoIterator<Item = Result<Value, RemoteCallError>>) -> Self {
        let transport = Self::default();
        transport.inner.replies.lock().extend(replies);
        transport
    }

    pub fn calls(&self) -> Vec<BotRequest> {
        self.inner.calls.lock().clone()
    }
}

impl BotTransport for RecordingTransport {
    async fn send(&self, request: BotRequest) -> Result<Value, RemoteCallError> {
        self.inner.calls.lock().push(request);
        self.inner
            .replies
            .lock()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
