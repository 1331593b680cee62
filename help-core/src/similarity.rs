use std::collections::{BTreeMap, BTreeSet, HashSet};

use help_types::{HelperProfile, PeerMatch, User};

use crate::matching::round_to_tenth;

pub const DEFAULT_PEER_LIMIT: usize = 5;

/// Closeness of two users' proficiency levels over the tags either of them
/// has rated, as a score in [0, 100].
///
/// Each tag contributes `1 - |a - b| / max(a, b, 1)`. Tags rated zero (or
/// missing) on both sides are left out of the average entirely, so two
/// users with no ratings in common score 0 rather than a perfect match.
pub fn skill_similarity(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let (score, compared) = closeness_sum(a, b);
    if compared == 0 {
        return 0.0;
    }
    score / compared as f64 * 100.0
}

fn closeness_sum(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> (f64, usize) {
    let tags: BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    let mut total = 0.0;
    let mut compared = 0;
    for tag in tags {
        let level_a = level(a, tag);
        let level_b = level(b, tag);
        if level_a == 0.0 && level_b == 0.0 {
            continue;
        }
        let spread = level_a.max(level_b).max(1.0);
        total += 1.0 - (level_a - level_b).abs() / spread;
        compared += 1;
    }
    (total, compared)
}

fn level(ratings: &BTreeMap<String, f64>, tag: &str) -> f64 {
    ratings
        .get(tag)
        .copied()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}

/// Suggest collaborators whose proficiency profile is closest to `user`.
pub fn suggest_peers(
    user: &User,
    candidates: &[User],
    limit: usize,
    online: &HashSet<String>,
) -> Vec<PeerMatch> {
    let mut peers: Vec<(&User, f64, usize)> = candidates
        .iter()
        .filter(|candidate| candidate.id != user.id)
        .map(|candidate| {
            let (_, compared) = closeness_sum(&user.skill_ratings, &candidate.skill_ratings);
            let score = skill_similarity(&user.skill_ratings, &candidate.skill_ratings);
            (candidate, score, compared)
        })
        .filter(|(_, score, _)| *score > 0.0)
        .collect();

    peers.sort_by(|(_, a, _), (_, b, _)| b.total_cmp(a));

    peers
        .into_iter()
        .take(limit)
        .map(|(candidate, score, compared)| PeerMatch {
            user: HelperProfile::from(candidate),
            similarity: round_to_tenth(score),
            compared_skills: compared as u32,
            is_online: online.contains(&candidate.id),
        })
        .collect()
}
