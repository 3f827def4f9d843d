use crate::time::{Duration, Service};

use thiserror::Error;

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, PartialOrd)]
pub enum SearchFailure {
    /// No fixed point found below the given divergence threshold.
    #[error("no fixed point less than or equal to {limit} found")]
    DivergenceLimitExceeded { limit: Duration },
}

pub type SearchResult = Result<Duration, SearchFailure>;

/// Conduct an iterative search for the least fixed point of
/// `workload` on a dedicated uniprocessor, starting from `start` and
/// giving up once the assumed response time exceeds
/// `divergence_limit`.
///
/// `workload` must be monotonically non-decreasing and satisfy
/// `workload(start) >= start`, which holds for any response-time
/// equation that starts from the WCET of the task under analysis.
fn iterative_search<RHS>(start: Duration, divergence_limit: Duration, workload: &RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let mut assumed_response_time = start;
    while assumed_response_time <= divergence_limit {
        let demand = workload(assumed_response_time);
        if demand.is_unbounded() {
            // saturated demand never fits any window
            break;
        }
        // on a dedicated processor, demand is served without delay
        let response_time_bound = Duration::from(demand);
        if response_time_bound <= assumed_response_time {
            // we have converged
            return Ok(response_time_bound);
        } else {
            // continue iterating
            assumed_response_time = response_time_bound
        }
    }
    // if we get here, we failed to converge => no solution
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
    })
}

/// Widest search range the debug-mode cross-check will scan.
#[cfg(debug_assertions)]
const BRUTE_FORCE_RANGE: u64 = 1 << 20;

/// Very slow, naive search for the least fixed point up to the given
/// `divergence_limit`. Do not use --- use [search] instead.
#[cfg(debug_assertions)]
fn brute_force_search<RHS>(start: Duration, divergence_limit: Duration, workload: &RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let (first, last) = (start.as_millis(), divergence_limit.as_millis());
    for r in (first..=last).map(Duration::from) {
        let demand = workload(r);
        if !demand.is_unbounded() && Duration::from(demand) <= r {
            return Ok(r);
        }
    }
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
    })
}

/// Search for the least fixed point `R = workload(R)` with
/// `start <= R <= divergence_limit`.
pub fn search<RHS>(start: Duration, divergence_limit: Duration, workload: RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let result = iterative_search(start, divergence_limit, &workload);
    // In debug mode, compare against the brute-force solution, as
    // long as the range is small enough to scan.
    #[cfg(debug_assertions)]
    if divergence_limit.as_millis().saturating_sub(start.as_millis()) <= BRUTE_FORCE_RANGE {
        debug_assert_eq!(
            brute_force_search(start, divergence_limit, &workload),
            result
        );
    }
    result
}
