/*! Feasibility analysis and workload generation for fixed-priority
real-time task sets.

The crate answers one question about a set of periodic and aperiodic
tasks: can every task meet its deadline under preemptive
rate-monotonic scheduling on a single processor? The central pieces
are

- [model::TaskSet], a bounded, write-once collection of task
  descriptors,
- [analysis::Analyzer], an exact response-time analysis of the
  periodic tasks plus a background-server bound on the aperiodic
  load, and
- [generator::AperiodicGenerator], a seeded and hence reproducible
  source of aperiodic arrivals for stress tests.

The kernel that actually runs tasks is out of scope; it is reached
only through [kernel::TaskFactory]. [simulation::Simulation] wires the
generator to such a factory and records what it synthesizes so that
it can be analyzed afterwards.

All times are integral milliseconds; see [time].
*/

pub mod analysis;
pub mod arrival;
pub mod demand;
pub mod fixed_point;
pub mod fixed_priority;
pub mod generator;
pub mod kernel;
pub mod model;
pub mod scenario;
pub mod simulation;
pub mod time;

pub use analysis::{analyze, AnalysisConfig, Analyzer, TaskRef, Verdict};
pub use generator::{AperiodicGenerator, AperiodicRequest, DurationClass, GeneratorConfig};
pub use kernel::{KernelError, TaskFactory};
pub use model::{TaskSet, TaskSetError, MAX_TASKS};

#[cfg(test)]
mod tests {
    use crate::time::{Duration, Instant, Service};

    // helper functions to make tests shorter
    pub(crate) fn d(dur: u64) -> Duration {
        Duration::from(dur)
    }

    pub(crate) fn i(at: u64) -> Instant {
        Instant::from(at)
    }

    pub(crate) fn s(service: u64) -> Service {
        Service::from(service)
    }
}
