//! Blocking HTTP gateway for the slides REST API.
//!
//! | Operation       | Endpoint                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | snapshot        | `GET  {base}/presentations/{id}`                            |
//! | submit_batch    | `POST {base}/presentations/{id}:batchUpdate`                |
//! | thumbnail_url   | `GET  {base}/presentations/{id}/pages/{page}/thumbnail`     |
//!
//! No retries: a failed call is reported and the caller aborts its phase.

use std::io::Read;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use deckmatch_core::Settings;

use super::wire::{Presentation, Thumbnail};
use super::{BatchReply, DeckSnapshot, GatewayError, Request, SlideGateway};

#[derive(Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [Request],
}

/// Gateway bound to one presentation for the lifetime of a run.
pub struct HttpGateway {
    agent: ureq::Agent,
    api_base: String,
    token: String,
    presentation_id: String,
}

impl HttpGateway {
    /// Build a gateway from settings. Fails when no access token is configured.
    pub fn new(settings: &Settings, presentation_id: &str) -> Result<Self, GatewayError> {
        let token = settings
            .access_token
            .clone()
            .ok_or(GatewayError::MissingToken)?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build();
        Ok(Self {
            agent,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            token,
            presentation_id: presentation_id.to_string(),
        })
    }

    fn presentation_url(&self) -> String {
        format!("{}/presentations/{}", self.api_base, self.presentation_id)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        tracing::debug!("GET {url}");
        let resp = self
            .agent
            .get(url)
            .set("Authorization", &self.bearer())
            .call()
            .map_err(map_ureq_err)?;
        resp.into_json::<T>()
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Download raw bytes, e.g. a thumbnail `contentUrl` (no auth header).
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        tracing::debug!("GET {url}");
        let resp = self.agent.get(url).call().map_err(map_ureq_err)?;
        let mut body = Vec::new();
        resp.into_reader()
            .read_to_end(&mut body)
            .map_err(|e| GatewayError::Transport(format!("failed to read body: {e}")))?;
        Ok(body)
    }
}

fn map_ureq_err(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::Status(status, resp) => GatewayError::Http {
            status,
            message: resp.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => GatewayError::Transport(t.to_string()),
    }
}

impl SlideGateway for HttpGateway {
    fn presentation_id(&self) -> &str {
        &self.presentation_id
    }

    fn snapshot(&mut self) -> Result<DeckSnapshot, GatewayError> {
        let presentation: Presentation = self.get_json(&self.presentation_url())?;
        Ok(presentation.into_snapshot())
    }

    fn submit_batch(&mut self, requests: &[Request]) -> Result<BatchReply, GatewayError> {
        let url = format!("{}:batchUpdate", self.presentation_url());
        tracing::debug!("POST {url} ({} requests)", requests.len());
        let resp = self
            .agent
            .post(&url)
            .set("Authorization", &self.bearer())
            .send_json(BatchUpdateBody { requests })
            .map_err(map_ureq_err)?;
        resp.into_json::<BatchReply>()
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn thumbnail_url(&mut self, position: usize) -> Result<String, GatewayError> {
        let page = self.resolve(position)?;
        let url = format!("{}/pages/{}/thumbnail", self.presentation_url(), page);
        let thumb: Thumbnail = self.get_json(&url)?;
        Ok(thumb.content_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_rejected_up_front() {
        let settings = Settings::default();
        assert!(matches!(
            HttpGateway::new(&settings, "deck"),
            Err(GatewayError::MissingToken)
        ));
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let settings = Settings {
            api_base: "http://localhost:9/v1/".into(),
            access_token: Some("t".into()),
            ..Settings::default()
        };
        let gw = HttpGateway::new(&settings, "abc").expect("gateway");
        assert_eq!(gw.presentation_url(), "http://localhost:9/v1/presentations/abc");
        assert_eq!(gw.presentation_id(), "abc");
    }
}
