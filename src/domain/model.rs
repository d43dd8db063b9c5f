use serde::{Deserialize, Serialize};

// Decoded response body, keyed by the response's declared content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    // A successfully decoded but empty body counts as "no data".
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Json(value) => value.is_null(),
            Payload::Text(text) => text.is_empty(),
            Payload::Bytes(bytes) => bytes.is_empty(),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    Started,
    Completed(Payload),
    Failed(String),
}

// Request lifecycle. Nominal flow is Idle/Succeeded/Failed -> Loading ->
// Succeeded | Failed; the reducer is total, so a completion arriving after a
// newer request has already resolved simply overwrites (last write wins).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(Payload),
    Failed(String),
}

impl RequestState {
    pub fn step(self, event: RequestEvent) -> RequestState {
        match event {
            RequestEvent::Started => RequestState::Loading,
            RequestEvent::Completed(payload) => RequestState::Succeeded(payload),
            RequestEvent::Failed(message) => RequestState::Failed(message),
        }
    }

    pub fn data(&self) -> Option<&Payload> {
        match self {
            RequestState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
        }
    }
}
