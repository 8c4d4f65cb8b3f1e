//! Hidden-gem scoring.
//!
//! The score divides the rating by a logarithmic damping of the audience
//! size: `score / log10(members + 10)`. With no members the damping is 1 and
//! the gem score equals the rating; every tenfold increase in members adds
//! roughly one to the divisor. The function is strictly increasing in the
//! rating and strictly decreasing in the member count.

/// Assigned to titles missing a rating or a member count. Ratings are never
/// negative, so the sentinel ranks below every defined gem score.
pub const HIDDEN_GEM_SENTINEL: f64 = -1.0;

const MEMBERS_OFFSET: f64 = 10.0;

pub fn hidden_gem_score(score: Option<f64>, members: Option<u64>) -> f64 {
    match (score, members) {
        (Some(score), Some(members)) if score.is_finite() && score >= 0.0 => {
            score / (members as f64 + MEMBERS_OFFSET).log10()
        }
        _ => HIDDEN_GEM_SENTINEL,
    }
}
