//! The demo workload: a fixed set of periodic busy-work tasks plus a
//! seeder task that injects aperiodic work, and the offline validation
//! run over the same periodic tasks.

use log::info;

use crate::analysis::{Analyzer, Verdict};
use crate::generator::{DurationClass, GeneratorConfig};
use crate::kernel::{Priority, TaskBody};
use crate::model::{TaskSet, TaskSetError};
use crate::time::Duration;

/// Static description of a periodic kernel task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTaskSpec {
    pub name: &'static str,
    pub body: TaskBody,
    pub priority: Priority,
    pub period: Duration,
}

pub const DEMO_PERIODIC_TASKS: [PeriodicTaskSpec; 3] = [
    PeriodicTaskSpec {
        name: "p-mt-5",
        body: TaskBody::Busy(DurationClass::Medium),
        priority: Priority::above_idle(5),
        period: Duration::from_millis(1000),
    },
    PeriodicTaskSpec {
        name: "p-st-5",
        body: TaskBody::Busy(DurationClass::Short),
        priority: Priority::above_idle(5),
        period: Duration::from_millis(5000),
    },
    PeriodicTaskSpec {
        name: "p-mt-4",
        body: TaskBody::Busy(DurationClass::Medium),
        priority: Priority::above_idle(4),
        period: Duration::from_millis(3000),
    },
];

/// The task that runs the aperiodic workload generator once per release.
pub const SEEDER_TASK: PeriodicTaskSpec = PeriodicTaskSpec {
    name: "p-seedert-2",
    body: TaskBody::AperiodicSeeder,
    priority: Priority::above_idle(6),
    period: Duration::from_millis(1000),
};

/// The demo periodic tasks as a task set, with WCETs taken from the
/// nominal durations in `config`.
pub fn theoretical_tasks(config: &GeneratorConfig) -> Result<TaskSet, TaskSetError> {
    let mut task_set = TaskSet::new();
    for spec in &DEMO_PERIODIC_TASKS {
        if let TaskBody::Busy(class) = spec.body {
            task_set.add_periodic(spec.period, class.nominal_wcet(config))?;
        }
    }
    Ok(task_set)
}

/// Analyze the demo periodic tasks offline and log the one-line report.
pub fn validation_run(analyzer: &Analyzer) -> Result<Verdict, TaskSetError> {
    let task_set = theoretical_tasks(&GeneratorConfig::default())?;
    let verdict = analyzer.analyze(&task_set);
    info!("validation run over {} periodic tasks: {}", task_set.periodic().len(), verdict);
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{d, s};

    #[test]
    fn theoretical_task_set() {
        let ts = theoretical_tasks(&GeneratorConfig::default()).unwrap();
        let params: Vec<_> = ts.periodic().iter().map(|t| (t.period, t.wcet)).collect();
        assert_eq!(
            params,
            vec![(d(1000), s(100)), (d(5000), s(50)), (d(3000), s(100))]
        );
        assert!(ts.aperiodic().is_empty());
    }

    #[test]
    fn demo_tasks_are_feasible() {
        let verdict = validation_run(&Analyzer::default()).unwrap();
        assert!(verdict.feasible);
        assert_eq!(verdict.to_string(), "TRUE - possible to schedule all tasks");
    }
}
