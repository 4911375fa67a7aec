use analyst_core::{DiscoverRequest, Discovery, HistoryTurn, SessionContext, SynthesisRequest};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::wire::{
    history_messages, AnalyseBody, AnalyseReply, DatabaseDescriptor, DeliverReply, DiscoverBody,
    PromptTableBody, ReportBody, SelectionBody, SessionInfoReply,
};
use crate::{BackendError, BackendSettings, FailureKind};

/// The remote operations the conversation pipeline depends on.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn load_session(&self, session_id: &str) -> Result<SessionContext, BackendError>;

    async fn discover(&self, request: &DiscoverRequest) -> Result<Discovery, BackendError>;

    /// Returns an opaque payload meant for [`Backend::deliver`].
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<serde_json::Value, BackendError>;

    /// Renders a synthesized payload and returns a link to the artifact.
    async fn deliver(&self, payload: &serde_json::Value) -> Result<String, BackendError>;

    async fn generate_report(
        &self,
        session_id: &str,
        extra: &[HistoryTurn],
    ) -> Result<Vec<u8>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = parse_endpoint(endpoint)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(check_status(response)?).await
    }

    fn database(&self) -> DatabaseDescriptor<'_> {
        DatabaseDescriptor::from(&self.settings.data_source)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn load_session(&self, session_id: &str) -> Result<SessionContext, BackendError> {
        let mut url = parse_endpoint(&self.settings.endpoints.session_info)?;
        url.query_pairs_mut().append_pair("dash_id", session_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: SessionInfoReply = decode_json(check_status(response)?).await?;
        Ok(reply.into())
    }

    async fn discover(&self, request: &DiscoverRequest) -> Result<Discovery, BackendError> {
        let endpoints = &self.settings.endpoints;
        let sampling = &self.settings.sampling;
        match request {
            DiscoverRequest::Candidates { prompt, history } => {
                let body = DiscoverBody {
                    prompt,
                    history: history_messages(history),
                    sampling: &sampling.discover,
                };
                let labels: Vec<String> = self.post_json(&endpoints.discover, &body).await?;
                Ok(Discovery::Candidates(labels))
            }
            DiscoverRequest::Analysis {
                prompt,
                history,
                scope,
            } => {
                let body = AnalyseBody {
                    prompt,
                    history: history_messages(history),
                    sampling: &sampling.analyse,
                    table: scope,
                };
                let reply: AnalyseReply = self.post_json(&endpoints.analyse, &body).await?;
                Ok(Discovery::Analysis { text: reply.text })
            }
        }
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<serde_json::Value, BackendError> {
        let endpoints = &self.settings.endpoints;
        let sampling = &self.settings.sampling;
        match request {
            SynthesisRequest::Selection { labels } => {
                let body = SelectionBody {
                    index_list: labels,
                    database: self.database(),
                    sampling: &sampling.synthesize_selection,
                };
                self.post_json(&endpoints.synthesize_selection, &body).await
            }
            SynthesisRequest::Prompt { prompt } => {
                let body = PromptTableBody {
                    prompt,
                    database: self.database(),
                    sampling: &sampling.synthesize_prompt,
                };
                self.post_json(&endpoints.synthesize_prompt, &body).await
            }
        }
    }

    async fn deliver(&self, payload: &serde_json::Value) -> Result<String, BackendError> {
        let endpoint = &self.settings.endpoints.deliver;
        let reply: DeliverReply = self.post_json(endpoint, payload).await?;
        let base = parse_endpoint(endpoint)?;
        Ok(resolve_link(&base, reply.dash))
    }

    async fn generate_report(
        &self,
        session_id: &str,
        extra: &[HistoryTurn],
    ) -> Result<Vec<u8>, BackendError> {
        let url = parse_endpoint(&self.settings.endpoints.report)?;
        let body = ReportBody {
            dash_id: session_id,
            extra: history_messages(extra),
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response)?;

        let max_bytes = self.settings.report_max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(BackendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "report too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(BackendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "report too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<reqwest::Url, BackendError> {
    reqwest::Url::parse(endpoint)
        .map_err(|err| BackendError::new(FailureKind::InvalidUrl, format!("{endpoint}: {err}")))
}

/// Relative dashboard links are made absolute against the deliver endpoint;
/// anything that cannot be joined is passed through as returned.
fn resolve_link(base: &reqwest::Url, link: String) -> String {
    if reqwest::Url::parse(&link).is_ok() {
        return link;
    }
    match base.join(&link) {
        Ok(joined) => joined.into(),
        Err(_) => link,
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

async fn decode_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, BackendError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
