use crate::core::{DataSource, Payload, RequestEvent, RequestOptions, RequestState};
use crate::utils::error::{DataError, Result};
use reqwest::Client;
use tokio::sync::{watch, Mutex};

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<Payload> {
        let method = reqwest::Method::from_bytes(options.method.as_bytes()).map_err(|_| {
            DataError::InvalidConfigValueError {
                field: "method".to_string(),
                value: options.method.clone(),
                reason: "Unknown HTTP method".to_string(),
            }
        })?;

        let mut request = self.client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        tracing::debug!("Making {} request to: {}", options.method, url);
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::NoData);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let payload = if content_type.contains("json") {
            Payload::Json(response.json().await?)
        } else if content_type.contains("text") {
            Payload::Text(response.text().await?)
        } else {
            Payload::Bytes(response.bytes().await?.to_vec())
        };

        // A decoded but empty body is reported as a failure, not an empty success.
        if payload.is_empty() {
            return Err(DataError::NoData);
        }

        Ok(payload)
    }
}

// Drives the request lifecycle over a data source and broadcasts every
// transition on a watch channel so observers can re-render.
pub struct Fetcher<S: DataSource = HttpSource> {
    source: S,
    state: watch::Sender<RequestState>,
    last_target: Mutex<Option<(String, RequestOptions)>>,
}

impl Fetcher<HttpSource> {
    pub fn new() -> Self {
        Self::with_source(HttpSource::new())
    }
}

impl Default for Fetcher<HttpSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DataSource> Fetcher<S> {
    pub fn with_source(source: S) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            source,
            state,
            last_target: Mutex::new(None),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    fn dispatch(&self, event: RequestEvent) -> RequestState {
        let next = self.state.borrow().clone().step(event);
        self.state.send_replace(next.clone());
        next
    }

    // Overlapping calls are not cancelled or de-duplicated; whichever
    // response resolves last owns the state.
    pub async fn fetch(&self, url: &str, options: &RequestOptions) -> RequestState {
        self.dispatch(RequestEvent::Started);
        match self.source.fetch(url, options).await {
            Ok(payload) => self.dispatch(RequestEvent::Completed(payload)),
            Err(e) => {
                tracing::debug!("Fetch from {} failed: {}", url, e);
                self.dispatch(RequestEvent::Failed(e.to_string()))
            }
        }
    }

    // Re-runs only when the target differs from the previous one. An empty
    // URL is a no-op and does not update the tracked target.
    pub async fn fetch_if_changed(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Option<RequestState> {
        if url.is_empty() {
            return None;
        }
        {
            let mut last = self.last_target.lock().await;
            if last
                .as_ref()
                .is_some_and(|(u, o)| u == url && o == options)
            {
                return None;
            }
            *last = Some((url.to_string(), options.clone()));
        }
        Some(self.fetch(url, options).await)
    }
}
