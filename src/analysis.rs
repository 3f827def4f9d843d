/*! Schedulability analysis of mixed periodic/aperiodic task sets.

The [Analyzer] decides whether a [TaskSet] is feasible under
preemptive rate-monotonic scheduling on a single processor:

1. Every periodic task must have a worst-case response time no
   larger than its period, taking into account preemptions by all
   tasks with shorter periods (ties go to the earlier insertion).
2. The aperiodic tasks, folded into a sporadic source with the
   smallest observed inter-arrival gap, are served in the background
   below all periodic tasks. Each such job must complete before the
   next one may arrive, and the capacity left over by the periodic
   tasks over the longest period must cover its WCET.

The analysis is a pure function of the task set. It never fails for a
well-formed set; infeasibility is reported as a [Verdict].
*/

use std::fmt;

use log::{debug, info};

use crate::arrival::{Periodic, Sporadic};
use crate::demand::{self, RBF};
use crate::fixed_point::SearchResult;
use crate::fixed_priority::background::{self, AperiodicLoad};
use crate::fixed_priority::fully_preemptive;
use crate::model::TaskSet;
use crate::time::{Duration, Service};

/// Tunables of the feasibility test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Minimum inter-arrival time assumed for the aperiodic load if
    /// all aperiodic tasks arrive at the same instant, so that no gap
    /// can be observed.
    pub single_aperiodic_min_inter_arrival: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            // one seeder release per second
            single_aperiodic_min_inter_arrival: Duration::from_millis(1000),
        }
    }
}

/// Identifies a task of a [TaskSet] by kind and insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskRef {
    Periodic(usize),
    Aperiodic(usize),
}

impl TaskRef {
    pub fn index(self) -> usize {
        match self {
            TaskRef::Periodic(i) | TaskRef::Aperiodic(i) => i,
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Periodic(i) => write!(f, "periodic task #{}", i),
            TaskRef::Aperiodic(i) => write!(f, "aperiodic task #{}", i),
        }
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub feasible: bool,
    /// The first task found to miss its deadline, if any.
    pub violation: Option<TaskRef>,
}

impl Verdict {
    pub fn feasible() -> Self {
        Verdict {
            feasible: true,
            violation: None,
        }
    }

    pub fn infeasible(culprit: TaskRef) -> Self {
        Verdict {
            feasible: false,
            violation: Some(culprit),
        }
    }

    pub fn violating_task_index(&self) -> Option<usize> {
        self.violation.map(TaskRef::index)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violation {
            None => write!(f, "TRUE - possible to schedule all tasks"),
            Some(culprit) => write!(
                f,
                "FALSE - impossible to schedule all tasks ({} cannot meet its deadline)",
                culprit
            ),
        }
    }
}

/// Response-time bound of one periodic task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicResult {
    /// Insertion index of the task.
    pub task: usize,
    /// Rate-monotonic priority; zero is the highest.
    pub priority: usize,
    pub period: Duration,
    pub response_time: SearchResult,
}

impl PeriodicResult {
    pub fn is_feasible(&self) -> bool {
        self.response_time.is_ok()
    }
}

/// Outcome of the background check of the aperiodic load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AperiodicResult {
    pub source: Sporadic,
    pub wcet: Service,
    /// Insertion index of the aperiodic task blamed for a violation.
    pub culprit: usize,
    pub response_time: SearchResult,
    pub spare_capacity_suffices: bool,
}

impl AperiodicResult {
    pub fn is_feasible(&self) -> bool {
        self.response_time.is_ok() && self.spare_capacity_suffices
    }
}

/// Exhaustive analysis results, covering every task even after the
/// first violation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Per-task results in priority order.
    pub periodic: Vec<PeriodicResult>,
    /// `None` if there are no aperiodic tasks.
    pub aperiodic: Option<AperiodicResult>,
    pub utilization: f64,
}

impl AnalysisReport {
    /// All tasks that cannot meet their deadlines, periodic tasks in
    /// priority order first.
    pub fn violations(&self) -> Vec<TaskRef> {
        self.periodic
            .iter()
            .filter(|r| !r.is_feasible())
            .map(|r| TaskRef::Periodic(r.task))
            .chain(
                self.aperiodic
                    .iter()
                    .filter(|r| !r.is_feasible())
                    .map(|r| TaskRef::Aperiodic(r.culprit)),
            )
            .collect()
    }

    /// The verdict [Analyzer::analyze] reports for the same task set.
    pub fn verdict(&self) -> Verdict {
        self.violations()
            .first()
            .map_or_else(Verdict::feasible, |culprit| Verdict::infeasible(*culprit))
    }
}

/// Exact response-time based feasibility test.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

/// The request-bound functions of a task set's periodic tasks,
/// together with their insertion indices, in priority order.
struct PriorityOrder {
    tasks: Vec<usize>,
    rbfs: Vec<RBF<Periodic>>,
}

impl PriorityOrder {
    fn of(task_set: &TaskSet) -> Self {
        let tasks = task_set.rate_monotonic_order();
        let rbfs = tasks
            .iter()
            .map(|i| task_set.periodic()[*i].rbf())
            .collect();
        PriorityOrder { tasks, rbfs }
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    fn rta(&self, priority: usize) -> PeriodicResult {
        let rbf = &self.rbfs[priority];
        let period = rbf.arrival_bound.period;
        let interference = demand::Slice::of(&self.rbfs[..priority]);
        let response_time = fully_preemptive::dedicated_uniproc_rta(&interference, rbf.wcet, period);
        debug!(
            "periodic task #{} (priority {}, period {}): response time {:?}",
            self.tasks[priority], priority, period, response_time
        );
        PeriodicResult {
            task: self.tasks[priority],
            priority,
            period,
            response_time,
        }
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn check_aperiodic(&self, task_set: &TaskSet, order: &PriorityOrder) -> Option<AperiodicResult> {
        let load = AperiodicLoad::from_tasks(
            task_set.aperiodic(),
            self.config.single_aperiodic_min_inter_arrival,
        )?;
        let periodic = demand::Slice::of(&order.rbfs[..]);
        let response_time = background::background_rta(&periodic, &load);
        // without periodic tasks, the whole processor is available
        // until the next arrival
        let window = task_set
            .longest_period()
            .unwrap_or(load.source.min_inter_arrival);
        let spare_capacity_suffices =
            background::spare_capacity_suffices(task_set.utilization(), window, load.wcet);
        debug!(
            "aperiodic load ({} every {}): response time {:?}, spare capacity suffices: {}",
            load.wcet, load.source.min_inter_arrival, response_time, spare_capacity_suffices
        );
        Some(AperiodicResult {
            source: load.source,
            wcet: load.wcet,
            culprit: load.culprit,
            response_time,
            spare_capacity_suffices,
        })
    }

    /// Decide feasibility of `task_set`, stopping at the first
    /// violation found. Periodic tasks are checked in priority order
    /// before the aperiodic load.
    pub fn analyze(&self, task_set: &TaskSet) -> Verdict {
        let order = PriorityOrder::of(task_set);
        let first_miss = (0..order.len())
            .map(|prio| order.rta(prio))
            .find(|r| !r.is_feasible());

        let verdict = match first_miss {
            Some(r) => Verdict::infeasible(TaskRef::Periodic(r.task)),
            None => match self.check_aperiodic(task_set, &order) {
                Some(r) if !r.is_feasible() => Verdict::infeasible(TaskRef::Aperiodic(r.culprit)),
                _ => Verdict::feasible(),
            },
        };
        info!("{}", verdict);
        verdict
    }

    /// Analyze every task of `task_set`, including those after the
    /// first violation.
    pub fn report(&self, task_set: &TaskSet) -> AnalysisReport {
        let order = PriorityOrder::of(task_set);
        AnalysisReport {
            periodic: (0..order.len()).map(|prio| order.rta(prio)).collect(),
            aperiodic: self.check_aperiodic(task_set, &order),
            utilization: task_set.utilization(),
        }
    }
}

/// Decide feasibility of `task_set` with the default configuration.
pub fn analyze(task_set: &TaskSet) -> Verdict {
    Analyzer::default().analyze(task_set)
}
