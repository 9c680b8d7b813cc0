//! In-memory gateway that replays scripted replies in order.

use async_trait::async_trait;
use controlroom_api::{ControlRoomError, Gateway, Method, Reply, describe_call};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<Reply, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, body: Value) -> Self {
        self.push(Ok(Reply::Success { status: 200, body }))
    }

    pub fn created(self, body: Value) -> Self {
        self.push(Ok(Reply::Success { status: 201, body }))
    }

    pub fn fail(self, status: u16, body: &str) -> Self {
        self.push(Ok(Reply::Failure {
            status,
            body: body.to_string(),
        }))
    }

    pub fn unreachable(self, message: &str) -> Self {
        self.push(Err(message.to_string()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(mut self, reply: Result<Reply, String>) -> Self {
        self.replies.get_mut().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Reply, ControlRoomError> {
        let operation = describe_call(&method, url);
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ControlRoomError::transport(operation, message)),
            None => Err(ControlRoomError::transport(operation, "no scripted reply left")),
        }
    }
}
