//! JSON bodies exchanged with the model service and the dashboard API.

use analyst_core::{HistoryTurn, ScopeItem, SessionContext};
use serde::{Deserialize, Serialize};

use crate::{DataSource, SamplingParams};

#[derive(Debug, Serialize)]
pub(crate) struct HistoryMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

pub(crate) fn history_messages(history: &[HistoryTurn]) -> Vec<HistoryMessage<'_>> {
    history
        .iter()
        .map(|turn| HistoryMessage {
            role: turn.role,
            content: &turn.content,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub(crate) struct DatabaseDescriptor<'a> {
    pub host: &'a str,
    // The synthesizer reads the port under this key.
    #[serde(rename = "post")]
    pub port: &'a str,
    pub name: &'a str,
    pub user: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a DataSource> for DatabaseDescriptor<'a> {
    fn from(source: &'a DataSource) -> Self {
        Self {
            host: &source.host,
            port: &source.port,
            name: &source.name,
            user: &source.user,
            password: source.password.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DiscoverBody<'a> {
    pub prompt: &'a str,
    pub history: Vec<HistoryMessage<'a>>,
    #[serde(flatten)]
    pub sampling: &'a SamplingParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyseBody<'a> {
    pub prompt: &'a str,
    pub history: Vec<HistoryMessage<'a>>,
    #[serde(flatten)]
    pub sampling: &'a SamplingParams,
    pub table: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyseReply {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionBody<'a> {
    pub index_list: &'a [String],
    pub database: DatabaseDescriptor<'a>,
    #[serde(flatten)]
    pub sampling: &'a SamplingParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct PromptTableBody<'a> {
    pub prompt: &'a str,
    pub database: DatabaseDescriptor<'a>,
    #[serde(flatten)]
    pub sampling: &'a SamplingParams,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeliverReply {
    pub dash: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportBody<'a> {
    pub dash_id: &'a str,
    pub extra: Vec<HistoryMessage<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionInfoReply {
    #[serde(default)]
    pub dash: DashSummary,
    #[serde(default)]
    pub charts: Vec<ChartReply>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashSummary {
    #[serde(default)]
    pub dash_sum: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartReply {
    pub chart_id: i64,
    #[serde(default)]
    pub chart_data: serde_json::Value,
}

impl From<SessionInfoReply> for SessionContext {
    fn from(reply: SessionInfoReply) -> Self {
        SessionContext {
            summary_text: reply.dash.dash_sum,
            scope_items: reply
                .charts
                .into_iter()
                .map(|chart| {
                    let title = chart
                        .chart_data
                        .pointer("/opts/sub_title")
                        .and_then(serde_json::Value::as_str)
                        .map(ToOwned::to_owned)
                        .unwrap_or_else(|| format!("Chart {}", chart.chart_id));
                    ScopeItem {
                        id: chart.chart_id,
                        title,
                        payload: chart.chart_data,
                    }
                })
                .collect(),
        }
    }
}
