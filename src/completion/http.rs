use super::{message_from_envelope, ChatRequest, CompletionClient, CompletionError};
use std::time::{Duration, Instant};

/// Upper bound on a single call; there is no retry or cancellation.
const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completion client over HTTPS with a bearer credential.
pub struct HttpCompletionClient {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(TRANSPORT_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
            api_key,
        }
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let Some(api_key) = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
        else {
            return Err(CompletionError::Transport(
                "no API key configured".to_string(),
            ));
        };

        let start = Instant::now();
        let mut response = self
            .agent
            .post(&self.url)
            .header("Authorization", format!("Bearer {api_key}"))
            .send_json(request)
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        let status = response.status().as_u16();

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            status,
            model = %request.model,
            "completion call complete"
        );

        if !(200..300).contains(&status) {
            return Err(CompletionError::Status { code: status });
        }
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        message_from_envelope(&body)
    }
}
