use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    CreatedRecord, LookupError, LookupResult, WeatherRequest,
    error::{CREATE_FALLBACK_MESSAGE, LOOKUP_FALLBACK_MESSAGE},
};

use super::LookupClient;

/// Talks to the weather service over HTTP.
///
/// No timeout is configured: a call waits until the transport settles or fails.
#[derive(Debug, Clone)]
pub struct HttpLookupClient {
    base_url: String,
    http: Client,
}

impl HttpLookupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The identifier is appended as typed; it is not percent-escaped here.
    pub fn lookup_url(&self, identifier: &str) -> String {
        format!("{}/weather/{}", self.base_url, identifier)
    }

    fn create_url(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait]
impl LookupClient for HttpLookupClient {
    async fn fetch(&self, identifier: &str) -> Result<LookupResult, LookupError> {
        let url = self.lookup_url(identifier);
        debug!(%url, "fetching weather record");

        let res = self.http.get(&url).send().await.map_err(|err| {
            warn!(%url, error = %err, "weather service unreachable");
            LookupError::transport(err)
        })?;

        let (status, body) = read_body(res).await?;

        if !status.is_success() {
            let message = detail_or(&body, LOOKUP_FALLBACK_MESSAGE);
            info!(status = status.as_u16(), %message, "weather lookup rejected");
            debug!(body = %truncate_body(&body), "rejected response body");
            return Err(LookupError::Rejected { status: status.as_u16(), message });
        }

        // Unparseable success body: reported like a failed connection.
        LookupResult::from_body(&body).ok_or_else(|| {
            warn!(body = %truncate_body(&body), "success response is not a JSON object");
            LookupError::transport(format!("unparseable {status} response body"))
        })
    }

    async fn create(&self, request: &WeatherRequest) -> Result<String, LookupError> {
        let url = self.create_url();
        debug!(%url, location = %request.location, date = %request.date, "creating weather record");

        let res = self.http.post(&url).json(request).send().await.map_err(|err| {
            warn!(%url, error = %err, "weather service unreachable");
            LookupError::transport(err)
        })?;

        let (status, body) = read_body(res).await?;

        if !status.is_success() {
            let message = detail_or(&body, CREATE_FALLBACK_MESSAGE);
            info!(status = status.as_u16(), %message, "weather record creation rejected");
            return Err(LookupError::Rejected { status: status.as_u16(), message });
        }

        let created: CreatedRecord = serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, body = %truncate_body(&body), "unexpected create response");
            LookupError::Rejected {
                status: status.as_u16(),
                message: CREATE_FALLBACK_MESSAGE.to_string(),
            }
        })?;

        info!(id = %created.id, "weather record created");
        Ok(created.id)
    }
}

/// A body that cannot be read counts as a transport failure.
async fn read_body(res: Response) -> Result<(StatusCode, String), LookupError> {
    let status = res.status();
    let body = res.text().await.map_err(|err| {
        warn!(status = status.as_u16(), error = %err, "failed to read response body");
        LookupError::transport(err)
    })?;
    Ok((status, body))
}

/// Pull a non-empty `detail` string out of an error body.
fn detail_or(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("detail")
            .and_then(Value::as_str)
            .filter(|detail| !detail.is_empty())
            .map(str::to_owned),
        _ => None,
    }
    .unwrap_or_else(|| fallback.to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
