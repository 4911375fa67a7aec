use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Full URLs of every remote operation the panel drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub discover: String,
    pub analyse: String,
    pub synthesize_selection: String,
    pub synthesize_prompt: String,
    pub deliver: String,
    pub report: String,
    pub session_info: String,
}

impl Endpoints {
    /// Builds every endpoint under two service roots: the model service and the dashboard API.
    pub fn with_roots(model_root: &str, dashboard_root: &str) -> Self {
        let model_root = model_root.trim_end_matches('/');
        let dashboard_root = dashboard_root.trim_end_matches('/');
        Self {
            discover: format!("{model_root}/generate_index"),
            analyse: format!("{model_root}/generate_analyse"),
            synthesize_selection: format!("{model_root}/generate_table2"),
            synthesize_prompt: format!("{model_root}/generate_table"),
            deliver: format!("{dashboard_root}/api/app/dash/"),
            report: format!("{dashboard_root}/api/app/gen_dash_reports/"),
            session_info: format!("{dashboard_root}/api/app/dash_info/"),
        }
    }

    pub fn all(&self) -> [(&'static str, &str); 7] {
        [
            ("discover", &self.discover),
            ("analyse", &self.analyse),
            ("synthesize_selection", &self.synthesize_selection),
            ("synthesize_prompt", &self.synthesize_prompt),
            ("deliver", &self.deliver),
            ("report", &self.report),
            ("session_info", &self.session_info),
        ]
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_roots("http://127.0.0.1:7860", "http://127.0.0.1:8088")
    }
}

/// Model sampling parameters forwarded with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

fn observation_stops() -> Vec<String> {
    vec!["\nObservation:".to_string(), "\nObservation :".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingProfile {
    pub discover: SamplingParams,
    pub analyse: SamplingParams,
    pub synthesize_selection: SamplingParams,
    pub synthesize_prompt: SamplingParams,
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self {
            discover: SamplingParams {
                temperature: 0.9,
                max_tokens: None,
                top_p: None,
                stop: Vec::new(),
            },
            analyse: SamplingParams {
                temperature: 1.0,
                max_tokens: Some(2048),
                top_p: Some(0.95),
                stop: Vec::new(),
            },
            synthesize_selection: SamplingParams {
                temperature: 0.1,
                max_tokens: Some(2048),
                top_p: Some(0.95),
                stop: observation_stops(),
            },
            synthesize_prompt: SamplingParams {
                temperature: 0.1,
                max_tokens: Some(2048),
                top_p: None,
                stop: observation_stops(),
            },
        }
    }
}

/// Database the synthesizer queries. The password is resolved by the host, never compiled in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSource {
    pub host: String,
    pub port: String,
    pub name: String,
    pub user: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub endpoints: Endpoints,
    pub sampling: SamplingProfile,
    pub data_source: DataSource,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub report_max_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            sampling: SamplingProfile::default(),
            data_source: DataSource::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            report_max_bytes: 32 * 1024 * 1024,
        }
    }
}
