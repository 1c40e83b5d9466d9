//! Target freshness: age and residual of the information held about each
//! target, and selection of the stalest one.
//!
//! Visits are decided elsewhere. This module only computes and selects.

use patrol_core::components::Target;
use patrol_core::entity::EntityId;

/// Seconds since `target` was last visited, as of tick `now`.
pub fn age_of_information(target: &Target, now: u64, tick_duration_secs: f64) -> f64 {
    (now - target.last_visit_tick) as f64 * tick_duration_secs
}

/// `1 - age / max_tolerated_idleness`. Negative once the target is overdue.
pub fn residual_of_information(target: &Target, now: u64, tick_duration_secs: f64) -> f64 {
    1.0 - age_of_information(target, now, tick_duration_secs) / target.max_tolerated_idleness_secs
}

/// Candidate with the largest age of information. Ties go to the first.
///
/// # Panics
///
/// Panics if `candidates` is empty, or if the selected target is `current`:
/// the caller is expected to leave its current target out.
pub fn oldest<'a>(
    candidates: &'a [Target],
    current: Option<EntityId>,
    now: u64,
    tick_duration_secs: f64,
) -> &'a Target {
    let selected = first_extremum(
        candidates,
        |t| age_of_information(t, now, tick_duration_secs),
        |k, best| k > best,
    );
    assert_ne!(Some(selected.id), current, "oldest target is the current one");
    selected
}

/// Candidate with the lowest residual of information. Ties go to the first.
///
/// # Panics
///
/// Same contract as [`oldest`].
pub fn lowest_residual<'a>(
    candidates: &'a [Target],
    current: Option<EntityId>,
    now: u64,
    tick_duration_secs: f64,
) -> &'a Target {
    let selected = first_extremum(
        candidates,
        |t| residual_of_information(t, now, tick_duration_secs),
        |k, best| k < best,
    );
    assert_ne!(
        Some(selected.id),
        current,
        "lowest-residual target is the current one"
    );
    selected
}

fn first_extremum<'a>(
    candidates: &'a [Target],
    key: impl Fn(&Target) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> &'a Target {
    assert!(!candidates.is_empty(), "no candidate targets");

    let mut best = &candidates[0];
    let mut best_key = key(best);
    for target in &candidates[1..] {
        let k = key(target);
        if better(k, best_key) {
            best = target;
            best_key = k;
        }
    }
    best
}
