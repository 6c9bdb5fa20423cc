use blindballot::{
    BallotSubmission, NetworkError, RegisterRequest, RegisterResponse, Registrar, TallyService,
};
use reqwest::blocking::{Client, Response};
use reqwest::header::COOKIE;
use serde::Serialize;

/// Talks to the registrar and tally endpoints of a voting server
pub struct HttpClient {
    client: Client,
    base_uri: String,
    session: Option<String>,
}

impl HttpClient {
    /// `session` is sent verbatim as the Cookie header
    pub fn new(base_uri: &str, session: Option<String>) -> Self {
        HttpClient {
            client: Client::new(),
            base_uri: base_uri.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response, NetworkError> {
        let full_uri = format!("{}{}", self.base_uri, path);
        log::debug!("POST {}", full_uri);

        let mut request = self.client.post(&full_uri).json(body);
        if let Some(session) = &self.session {
            request = request.header(COOKIE, session.as_str());
        }

        let res = request
            .send()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            return Err(NetworkError::Status(res.status().as_u16()));
        }
        Ok(res)
    }
}

impl Registrar for HttpClient {
    fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, NetworkError> {
        self.post("/ballot/register", request)?
            .json()
            .map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

impl TallyService for HttpClient {
    fn submit(&self, submission: &BallotSubmission) -> Result<serde_json::Value, NetworkError> {
        let body = self
            .post("/ballot/submit", submission)?
            .text()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        // The acknowledgement is opaque, and not always JSON
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}
