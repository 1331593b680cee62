//! Judge-independent parts of code execution: language ids, status labels and
//! output grading. The HTTP client lives in the server crate.

use help_types::{ExecutionReport, SubmittedTestCase, TestCaseResult};

pub const ACCEPTED: u32 = 3;
pub const WRONG_ANSWER: u32 = 4;
pub const DEFAULT_LANGUAGE_ID: u32 = 63;

/// Status ids at or below this value are still queued or running.
pub const LAST_PENDING_STATUS: u32 = 2;

pub fn language_id(language: &str) -> u32 {
    match language.to_lowercase().as_str() {
        "javascript" => 63,
        "python" => 71,
        "java" => 62,
        "cpp" => 54,
        "c" => 50,
        "csharp" => 51,
        "php" => 68,
        "ruby" => 72,
        "swift" => 83,
        "go" => 60,
        "rust" => 73,
        "kotlin" => 78,
        "scala" => 81,
        "r" => 80,
        "dart" => 69,
        "elixir" => 57,
        "erlang" => 58,
        "clojure" => 86,
        "fsharp" => 87,
        "assembly" => 45,
        "bash" => 46,
        "basic" => 47,
        "cobol" => 49,
        "lisp" => 64,
        "lua" => 70,
        "nim" => 88,
        "objectivec" => 79,
        "pascal" => 67,
        "perl" => 85,
        "prolog" => 66,
        "sql" => 82,
        "typescript" => 74,
        "vb" => 84,
        _ => DEFAULT_LANGUAGE_ID,
    }
}

pub fn status_label(status_id: u32) -> &'static str {
    match status_id {
        1 => "In Queue",
        2 => "Processing",
        3 => "Accepted",
        4 => "Wrong Answer",
        5 => "Time Limit Exceeded",
        6 => "Compilation Error",
        7 => "Runtime Error (SIGSEGV)",
        8 => "Runtime Error (SIGXFSZ)",
        9 => "Runtime Error (SIGFPE)",
        10 => "Runtime Error (SIGABRT)",
        11 => "Runtime Error (NZEC)",
        12 => "Runtime Error (Other)",
        13 => "Internal Error",
        14 => "Exec Format Error",
        _ => "Unknown Status",
    }
}

pub fn is_finished(status_id: u32) -> bool {
    status_id > LAST_PENDING_STATUS
}

/// Compare program output with an expected value: structurally as JSON
/// when both sides parse, then as comma separated values with brackets and
/// whitespace removed, then as strings with all whitespace removed.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    let actual = actual.trim();
    let expected = expected.trim();

    if let (Ok(a), Ok(e)) = (
        serde_json::from_str::<serde_json::Value>(actual),
        serde_json::from_str::<serde_json::Value>(expected),
    ) {
        return a == e;
    }

    let actual_csv = strip_list_syntax(actual);
    let expected_csv = strip_list_syntax(expected);
    if !actual.is_empty()
        && !expected.is_empty()
        && actual_csv.split(',').eq(expected_csv.split(','))
    {
        return true;
    }

    without_whitespace(actual) == without_whitespace(expected)
}

fn strip_list_syntax(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '[' | ']') && !c.is_whitespace())
        .collect()
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// What the judge reported for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub status_id: u32,
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    pub time: f64,
    pub memory: u64,
}

impl RunOutcome {
    pub fn accepted(&self) -> bool {
        self.status_id == ACCEPTED
    }
}

/// Fold per-test-case runs into a single report. `runs[i]` belongs to
/// `test_cases[i]`; with no test cases a single ungraded run is expected.
pub fn build_report(
    language: &str,
    test_cases: &[SubmittedTestCase],
    runs: &[RunOutcome],
) -> ExecutionReport {
    let results: Vec<TestCaseResult> = test_cases
        .iter()
        .enumerate()
        .map(|(index, case)| match runs.get(index) {
            Some(run) => TestCaseResult {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: run.stdout.clone(),
                passed: run.accepted() && outputs_match(&run.stdout, &case.expected),
            },
            None => TestCaseResult {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: "Not executed".to_string(),
                passed: false,
            },
        })
        .collect();

    let first_failure = if test_cases.is_empty() {
        runs.iter().position(|run| !run.accepted())
    } else {
        results.iter().position(|result| !result.passed)
    };
    let reported = first_failure
        .and_then(|index| runs.get(index))
        .or_else(|| runs.first());

    let Some(run) = reported else {
        return disabled_report(language, test_cases);
    };

    let status = match first_failure {
        None => status_label(ACCEPTED),
        // Ran fine but printed the wrong thing.
        Some(_) if run.accepted() => status_label(WRONG_ANSWER),
        Some(_) => status_label(run.status_id),
    };

    ExecutionReport {
        success: first_failure.is_none(),
        status: status.to_string(),
        output: run.stdout.clone(),
        error: run.stderr.clone(),
        compile_output: run.compile_output.clone(),
        time: run.time,
        memory: run.memory,
        language: language.to_string(),
        test_cases: results,
    }
}

/// Report used when code execution is switched off: every submission fails.
pub fn disabled_report(language: &str, test_cases: &[SubmittedTestCase]) -> ExecutionReport {
    ExecutionReport {
        success: false,
        status: status_label(WRONG_ANSWER).to_string(),
        output: String::new(),
        error: "Code execution is disabled".to_string(),
        compile_output: String::new(),
        time: 0.0,
        memory: 0,
        language: language.to_string(),
        test_cases: test_cases
            .iter()
            .map(|case| TestCaseResult {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: "Not executed".to_string(),
                passed: false,
            })
            .collect(),
    }
}
