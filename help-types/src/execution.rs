use serde::{Deserialize, Serialize};
use ts_rs::TS;

fn default_language() -> String {
    "javascript".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExecuteRequest {
    pub code: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub test_cases: Vec<SubmittedTestCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubmittedTestCase {
    pub input: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestCaseResult {
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExecutionReport {
    pub success: bool,
    pub status: String,
    pub output: String,
    pub error: String,
    pub compile_output: String,
    pub time: f64,   // seconds
    pub memory: u64, // kilobytes
    pub language: String,
    pub test_cases: Vec<TestCaseResult>,
}
