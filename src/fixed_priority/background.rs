use std::cmp::Reverse;

use itertools::Itertools;

use super::fully_preemptive;
use crate::arrival::Sporadic;
use crate::demand::RequestBound;
use crate::fixed_point;
use crate::model::AperiodicTask;
use crate::time::{Duration, Service};

// Slack for comparing floating-point utilization against integral service.
const EPSILON: f64 = 1e-9;

/// Aperiodic arrivals folded into a single sporadic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AperiodicLoad {
    /// The smallest observed separation between arrival instants.
    pub source: Sporadic,
    /// The largest demand released at any single arrival instant.
    pub wcet: Service,
    /// Insertion index of the first aperiodic task released at the
    /// instant with the largest demand.
    pub culprit: usize,
}

impl AperiodicLoad {
    /// Fold a sequence of aperiodic tasks into a sporadic source.
    ///
    /// Tasks arriving at the same instant are merged into one job
    /// whose WCET is the sum of theirs. The minimum inter-arrival
    /// time is the smallest gap between consecutive distinct arrival
    /// instants or, if there is only one such instant,
    /// `single_arrival_bound`. Returns `None` if there are no tasks.
    pub fn from_tasks(tasks: &[AperiodicTask], single_arrival_bound: Duration) -> Option<Self> {
        // (arrival, summed demand, first insertion index) per distinct instant
        let jobs: Vec<_> = (0..tasks.len())
            .sorted_by_key(|i| tasks[*i].arrival)
            .group_by(|i| tasks[*i].arrival)
            .into_iter()
            .map(|(arrival, group)| {
                let members: Vec<usize> = group.collect();
                let demand: Service = members.iter().map(|i| tasks[*i].wcet).sum();
                (arrival, demand, members[0])
            })
            .collect();

        let (_, wcet, culprit) = *jobs
            .iter()
            .max_by_key(|(_, demand, first)| (*demand, Reverse(*first)))?;

        let min_inter_arrival = jobs
            .iter()
            .tuple_windows()
            .map(|((a, _, _), (b, _, _))| b.since(*a))
            .min()
            .unwrap_or(single_arrival_bound);

        Some(AperiodicLoad {
            source: Sporadic::new(min_inter_arrival),
            wcet,
            culprit,
        })
    }
}

/// Bound the response time of the aperiodic load served in the
/// background, i.e., below all periodic tasks, whose total demand is
/// given by `periodic`. The load is feasible only if each job
/// completes before the next one may arrive.
pub fn background_rta<RBF>(periodic: &RBF, load: &AperiodicLoad) -> fixed_point::SearchResult
where
    RBF: RequestBound + ?Sized,
{
    fully_preemptive::dedicated_uniproc_rta(periodic, load.wcet, load.source.min_inter_arrival)
}

/// Check whether the processor capacity left over by the periodic
/// tasks, `1 - utilization`, accumulated over `window`, covers
/// `wcet`.
pub fn spare_capacity_suffices(utilization: f64, window: Duration, wcet: Service) -> bool {
    let spare = (1.0 - utilization) * window.as_millis() as f64;
    spare + EPSILON >= wcet.as_millis() as f64
}
