use help_types::{Difficulty, HelpError, HelpRequest, Problem, RequestStatus};

/// Parse an optional difficulty query value. `All` and blank mean no filter.
pub fn parse_difficulty(raw: Option<&str>) -> Result<Option<Difficulty>, HelpError> {
    match raw.map(str::trim) {
        None | Some("") | Some("All") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

pub fn parse_status(raw: Option<&str>) -> Result<Option<RequestStatus>, HelpError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Comma separated tags; blank input means no filter.
pub fn parse_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let tags: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}

fn shares_tag(tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|tag| tags.contains(tag))
}

/// Conjunction of independent predicates; `None` fields constrain nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelpRequestFilter {
    pub difficulty: Option<Difficulty>,
    pub status: Option<RequestStatus>,
    pub tags: Option<Vec<String>>,
}

impl HelpRequestFilter {
    pub fn from_query(
        difficulty: Option<&str>,
        status: Option<&str>,
        tags: Option<&str>,
    ) -> Result<Self, HelpError> {
        Ok(Self {
            difficulty: parse_difficulty(difficulty)?,
            status: parse_status(status)?,
            tags: parse_tags(tags),
        })
    }

    pub fn matches(&self, request: &HelpRequest) -> bool {
        self.difficulty.is_none_or(|d| request.difficulty == d)
            && self.status.is_none_or(|s| request.status == s)
            && self
                .tags
                .as_deref()
                .is_none_or(|wanted| shares_tag(&request.tags, wanted))
    }

    pub fn apply(&self, requests: Vec<HelpRequest>) -> Vec<HelpRequest> {
        requests.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
}

impl ProblemFilter {
    pub fn from_query(difficulty: Option<&str>, tags: Option<&str>) -> Result<Self, HelpError> {
        Ok(Self {
            difficulty: parse_difficulty(difficulty)?,
            tags: parse_tags(tags),
        })
    }

    pub fn matches(&self, problem: &Problem) -> bool {
        self.difficulty.is_none_or(|d| problem.difficulty == d)
            && self
                .tags
                .as_deref()
                .is_none_or(|wanted| shares_tag(&problem.tags, wanted))
    }

    pub fn apply(&self, problems: Vec<Problem>) -> Vec<Problem> {
        problems.into_iter().filter(|p| self.matches(p)).collect()
    }
}
