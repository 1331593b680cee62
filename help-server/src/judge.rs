//! HTTP client for a Judge0 compatible code execution service.

use help_core::{RunOutcome, build_report, disabled_report, is_finished, language_id};
use help_types::{ExecuteRequest, ExecutionReport, HelpError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const CPU_TIME_LIMIT_SECS: u32 = 5;
const MEMORY_LIMIT_KB: u32 = 512_000;

#[derive(Debug, Clone)]
pub struct JudgeSettings {
    /// When false every submission is reported as failed without a request.
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

#[derive(Serialize)]
struct Submission<'a> {
    source_code: &'a str,
    language_id: u32,
    stdin: &'a str,
    cpu_time_limit: u32,
    memory_limit: u32,
    enable_network: bool,
}

#[derive(Deserialize)]
struct SubmissionToken {
    token: String,
}

#[derive(Deserialize)]
struct SubmissionStatus {
    id: u32,
}

#[derive(Deserialize)]
struct SubmissionResult {
    status: SubmissionStatus,
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    compile_output: Option<String>,
    /// Seconds, sent as a decimal string.
    #[serde(default)]
    time: Option<serde_json::Value>,
    #[serde(default)]
    memory: Option<u64>,
}

impl From<SubmissionResult> for RunOutcome {
    fn from(result: SubmissionResult) -> Self {
        let time = match result.time {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };

        RunOutcome {
            status_id: result.status.id,
            stdout: result.stdout.unwrap_or_default(),
            stderr: result.stderr.unwrap_or_default(),
            compile_output: result.compile_output.unwrap_or_default(),
            time,
            memory: result.memory.unwrap_or(0),
        }
    }
}

pub struct JudgeClient {
    settings: JudgeSettings,
    http: reqwest::Client,
}

fn upstream(context: &str, err: impl std::fmt::Display) -> HelpError {
    error!("{}: {}", context, err);
    HelpError::UpstreamFailure(format!("{}: {}", context, err))
}

impl JudgeClient {
    pub fn new(settings: JudgeSettings) -> Self {
        if settings.enabled && settings.api_key.is_none() {
            warn!("Code execution enabled without JUDGE0_API_KEY; requests may be refused");
        }
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Run `request.code` once per test case (or once with empty stdin when
    /// there are none) and grade the outputs. A disabled client fails every
    /// submission, including empty ones.
    pub async fn execute(&self, request: ExecuteRequest) -> Result<ExecutionReport, HelpError> {
        if !self.settings.enabled {
            info!("Code execution disabled, rejecting {} submission", request.language);
            return Ok(disabled_report(&request.language, &request.test_cases));
        }

        let code = request
            .code
            .filter(|code| !code.trim().is_empty())
            .ok_or_else(|| HelpError::missing("Code"))?;

        let language = language_id(&request.language);
        let mut runs = Vec::new();
        if request.test_cases.is_empty() {
            runs.push(self.run_once(&code, language, "").await?);
        } else {
            for case in &request.test_cases {
                runs.push(self.run_once(&code, language, &case.input).await?);
            }
        }

        Ok(build_report(&request.language, &request.test_cases, &runs))
    }

    async fn run_once(&self, code: &str, language_id: u32, stdin: &str) -> Result<RunOutcome, HelpError> {
        let token = self.submit(code, language_id, stdin).await?;

        let mut last = RunOutcome::default();
        for attempt in 1..=self.settings.max_attempts {
            tokio::time::sleep(self.settings.poll_interval).await;
            last = self.fetch(&token).await?;
            debug!("Submission {} attempt {}: status {}", token, attempt, last.status_id);
            if is_finished(last.status_id) {
                break;
            }
        }
        Ok(last)
    }

    async fn submit(&self, code: &str, language_id: u32, stdin: &str) -> Result<String, HelpError> {
        let url = format!("{}/submissions", self.base_url());
        let body = Submission {
            source_code: code,
            language_id,
            stdin,
            cpu_time_limit: CPU_TIME_LIMIT_SECS,
            memory_limit: MEMORY_LIMIT_KB,
            enable_network: false,
        };

        let response = self
            .with_headers(self.http.post(&url))
            .query(&[("base64_encoded", "false"), ("wait", "false")])
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| upstream("Failed to submit code", e))?;

        let token: SubmissionToken = response
            .json()
            .await
            .map_err(|e| upstream("Invalid submission response", e))?;
        Ok(token.token)
    }

    async fn fetch(&self, token: &str) -> Result<RunOutcome, HelpError> {
        let url = format!("{}/submissions/{}", self.base_url(), token);

        let response = self
            .with_headers(self.http.get(&url))
            .query(&[("base64_encoded", "false")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| upstream("Failed to fetch submission", e))?;

        let result: SubmissionResult = response
            .json()
            .await
            .map_err(|e| upstream("Invalid submission result", e))?;
        Ok(result.into())
    }

    fn base_url(&self) -> &str {
        self.settings.api_url.trim_end_matches('/')
    }

    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let Some(key) = &self.settings.api_key else {
            return builder;
        };
        let builder = builder.header("X-RapidAPI-Key", key);
        match reqwest::Url::parse(&self.settings.api_url) {
            Ok(url) => match url.host_str() {
                Some(host) => builder.header("X-RapidAPI-Host", host),
                None => builder,
            },
            Err(_) => builder,
        }
    }
}
