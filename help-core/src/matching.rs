use std::cmp::Ordering;
use std::collections::HashSet;

use help_types::{HelpError, HelperMatch, HelperProfile, User};

pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Split a comma separated tag list, trimming whitespace and dropping empty
/// and repeated tags. An empty result is an input error.
pub fn parse_skill_list(raw: &str) -> Result<Vec<String>, HelpError> {
    let mut seen = HashSet::new();
    let skills: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .filter(|skill| seen.insert(skill.to_string()))
        .map(str::to_string)
        .collect();

    if skills.is_empty() {
        return Err(HelpError::InvalidInput(
            "Skills parameter is required".to_string(),
        ));
    }
    Ok(skills)
}

/// Coverage of one candidate against the required tags.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillCoverage {
    pub matched: usize,
    pub required: usize,
    pub mean_proficiency: f64,
}

impl SkillCoverage {
    pub fn of(user: &User, required: &[String]) -> Self {
        let levels: Vec<f64> = required
            .iter()
            .filter_map(|skill| user.proficiency(skill))
            .collect();

        let mean_proficiency = if levels.is_empty() {
            0.0
        } else {
            levels.iter().sum::<f64>() / levels.len() as f64
        };

        SkillCoverage {
            matched: levels.len(),
            required: required.len(),
            mean_proficiency,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.required == 0 {
            return 0.0;
        }
        self.matched as f64 / self.required as f64 * 100.0
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .percentage()
            .total_cmp(&self.percentage())
            .then_with(|| other.mean_proficiency.total_cmp(&self.mean_proficiency))
    }
}

/// Rank every user except the requester by how well they cover the
/// required skills. `online` holds the ids of users with a live connection.
pub fn rank_helpers(
    users: &[User],
    requester_id: &str,
    required: &[String],
    limit: usize,
    online: &HashSet<String>,
) -> Result<Vec<HelperMatch>, HelpError> {
    if required.is_empty() {
        return Err(HelpError::InvalidInput(
            "Skills parameter is required".to_string(),
        ));
    }

    let mut candidates: Vec<(&User, SkillCoverage)> = users
        .iter()
        .filter(|user| user.id != requester_id)
        .map(|user| (user, SkillCoverage::of(user, required)))
        .filter(|(_, coverage)| coverage.matched > 0)
        .collect();

    candidates.sort_by(|(_, a), (_, b)| a.rank_cmp(b));

    Ok(candidates
        .into_iter()
        .take(limit)
        .map(|(user, coverage)| HelperMatch {
            user: HelperProfile::from(user),
            skill_match: coverage.percentage().round() as u32,
            average_skill_rating: round_to_tenth(coverage.mean_proficiency),
            matched_skills: coverage.matched as u32,
            total_required_skills: coverage.required as u32,
            is_online: online.contains(&user.id),
            response_time: user.stats.avg_response_time.clone(),
        })
        .collect())
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
