use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;

/// Blocking transport over `ureq`.
///
/// Status codes are returned as data; only connection-level failures become
/// `ApiError::Transport`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");

        let headers = request.headers;
        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&request.path), &headers).call(),
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(&request.path), &headers).call()
            }
            (HttpMethod::Post, body) => with_headers(self.agent.post(&request.path), &headers)
                .send(body.unwrap_or_default().as_bytes()),
            (HttpMethod::Put, body) => with_headers(self.agent.put(&request.path), &headers)
                .send(body.unwrap_or_default().as_bytes()),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, "received response");
        Ok(HttpResponse::new(status, body))
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}
