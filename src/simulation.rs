/*! Online driver for the demo workload.

A [Simulation] installs the demo periodic tasks into a kernel and then
runs the aperiodic workload generator once per release of the seeder
task. Every aperiodic arrival is also recorded in a [TaskSet], so that
the synthesized workload can be fed to the feasibility test
afterwards.
*/

use log::{info, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::analysis::{Analyzer, Verdict};
use crate::generator::{AperiodicGenerator, AperiodicRequest, ConfigError, GeneratorConfig};
use crate::kernel::{KernelError, TaskBody, TaskFactory, TaskHandle};
use crate::model::{TaskSet, TaskSetError, MAX_TASKS};
use crate::scenario::{PeriodicTaskSpec, DEMO_PERIODIC_TASKS, SEEDER_TASK};
use crate::time::{Instant, Service};

/// WCET recorded for the seeder task, which only does book-keeping.
const SEEDER_WCET: Service = Service::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Whether the seeder task is installed at all.
    pub seed_aperiodic_tasks: bool,
    pub generator: GeneratorConfig,
    /// Bound on the number of recorded tasks of each kind.
    pub record_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed_aperiodic_tasks: true,
            generator: GeneratorConfig::default(),
            record_capacity: MAX_TASKS,
        }
    }
}

/// What happened during [Simulation::run].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub releases: u64,
    /// Aperiodic tasks created in the kernel.
    pub created: usize,
    /// Aperiodic tasks recorded in the task set.
    pub recorded: usize,
}

pub struct Simulation<R = StdRng> {
    generator: AperiodicGenerator<R>,
    seed_aperiodic_tasks: bool,
    task_set: TaskSet,
    recording: bool,
    releases: u64,
    handles: Vec<TaskHandle>,
}

impl Simulation<StdRng> {
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        let generator = AperiodicGenerator::with_config(config.generator, seed)?;
        Ok(Simulation {
            generator,
            seed_aperiodic_tasks: config.seed_aperiodic_tasks,
            task_set: TaskSet::with_capacity(config.record_capacity),
            recording: true,
            releases: 0,
            handles: Vec::new(),
        })
    }
}

impl<R: Rng> Simulation<R> {
    /// The tasks recorded so far.
    pub fn task_set(&self) -> &TaskSet {
        &self.task_set
    }

    pub fn generator(&self) -> &AperiodicGenerator<R> {
        &self.generator
    }

    /// Handles of all tasks created so far, in creation order.
    pub fn handles(&self) -> &[TaskHandle] {
        &self.handles
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    fn record(&mut self, result: Result<(), TaskSetError>) {
        match result {
            Ok(()) => (),
            Err(e @ TaskSetError::CapacityExceeded { .. }) => {
                warn!("{}; no longer recording arrivals", e);
                self.recording = false;
            }
            Err(e) => warn!("not recording task: {}", e),
        }
    }

    fn create_periodic<F>(
        &mut self,
        factory: &mut F,
        spec: &PeriodicTaskSpec,
        wcet: Service,
    ) -> Result<(), KernelError>
    where
        F: TaskFactory + ?Sized,
    {
        let handle = factory.create_periodic(spec.body, spec.name, spec.priority, spec.period)?;
        self.handles.push(handle);
        let recorded = self.task_set.add_periodic(spec.period, wcet);
        self.record(recorded);
        Ok(())
    }

    /// Create the demo periodic tasks and, if enabled, the seeder
    /// task. Call once, before the first [Simulation::step].
    pub fn install<F>(&mut self, factory: &mut F) -> Result<(), KernelError>
    where
        F: TaskFactory + ?Sized,
    {
        for spec in &DEMO_PERIODIC_TASKS {
            let wcet = match spec.body {
                TaskBody::Busy(class) => class.nominal_wcet(self.generator.config()),
                TaskBody::AperiodicSeeder => SEEDER_WCET,
            };
            self.create_periodic(factory, spec, wcet)?;
        }
        if self.seed_aperiodic_tasks {
            self.create_periodic(factory, &SEEDER_TASK, SEEDER_WCET)?;
        }
        info!("installed {} periodic tasks", self.handles.len());
        Ok(())
    }

    /// Simulate one release of the seeder task.
    pub fn step<F>(&mut self, factory: &mut F) -> Result<Option<AperiodicRequest>, KernelError>
    where
        F: TaskFactory + ?Sized,
    {
        if !self.seed_aperiodic_tasks {
            return Ok(None);
        }
        let release = self.releases;
        self.releases += 1;
        let (request, handle) = match self.generator.submit(release, factory)? {
            Some(created) => created,
            None => return Ok(None),
        };
        self.handles.push(handle);
        if self.recording {
            let arrival = Instant::from_millis(release * SEEDER_TASK.period.as_millis());
            let wcet = request.class.nominal_wcet(self.generator.config());
            let recorded = self.task_set.add_aperiodic(arrival, wcet);
            self.record(recorded);
        }
        Ok(Some(request))
    }

    /// Simulate `releases` releases of the seeder task, stopping at
    /// the first kernel failure.
    pub fn run<F>(&mut self, factory: &mut F, releases: u64) -> Result<RunSummary, KernelError>
    where
        F: TaskFactory + ?Sized,
    {
        let recorded_before = self.task_set.aperiodic().len();
        let mut summary = RunSummary::default();
        for _ in 0..releases {
            if self.step(factory)?.is_some() {
                summary.created += 1;
            }
            summary.releases += 1;
        }
        summary.recorded = self.task_set.aperiodic().len() - recorded_before;
        info!(
            "{} releases: {} aperiodic tasks created, {} recorded",
            summary.releases, summary.created, summary.recorded
        );
        Ok(summary)
    }

    /// Run the feasibility test over everything recorded so far.
    pub fn analyze(&self, analyzer: &Analyzer) -> Verdict {
        analyzer.analyze(&self.task_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TaskRef;
    use crate::kernel::SimulatedKernel;
    use crate::model::TaskKind;
    use crate::tests::{d, i, s};

    #[test]
    fn installs_demo_tasks() {
        let mut kernel = SimulatedKernel::with_capacity(16);
        let mut sim = Simulation::new(SimulationConfig::default(), 1).unwrap();
        sim.install(&mut kernel).unwrap();

        let names: Vec<_> = kernel.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["p-mt-5", "p-st-5", "p-mt-4", "p-seedert-2"]);
        assert_eq!(kernel.tasks()[3].body, TaskBody::AperiodicSeeder);
        assert_eq!(sim.task_set().periodic().len(), 4);
        assert!(sim.analyze(&Analyzer::default()).feasible);
    }

    #[test]
    fn seeding_disabled() {
        let config = SimulationConfig {
            seed_aperiodic_tasks: false,
            ..SimulationConfig::default()
        };
        let mut kernel = SimulatedKernel::with_capacity(16);
        let mut sim = Simulation::new(config, 1).unwrap();
        sim.install(&mut kernel).unwrap();
        assert_eq!(kernel.tasks().len(), 3);

        let summary = sim.run(&mut kernel, 20).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(sim.releases(), 0);
        assert!(sim.task_set().aperiodic().is_empty());
    }

    #[test]
    fn arrivals_are_recorded_per_release() {
        let mut kernel = SimulatedKernel::with_capacity(64);
        let mut sim = Simulation::new(SimulationConfig::default(), 5).unwrap();
        sim.install(&mut kernel).unwrap();
        let summary = sim.run(&mut kernel, 30).unwrap();

        assert_eq!(summary.releases, 30);
        assert_eq!(summary.created, summary.recorded);
        let aperiodic: Vec<_> = kernel
            .tasks()
            .iter()
            .filter(|t| t.kind == TaskKind::Aperiodic)
            .collect();
        assert_eq!(aperiodic.len(), summary.created);
        for task in sim.task_set().aperiodic() {
            assert_eq!(task.arrival.as_millis() % 1000, 0);
            assert!(task.arrival < i(30_000));
        }
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut kernel = SimulatedKernel::with_capacity(64);
            let mut sim = Simulation::new(SimulationConfig::default(), seed).unwrap();
            sim.install(&mut kernel).unwrap();
            sim.run(&mut kernel, 40).unwrap();
            (kernel.tasks().to_vec(), sim.task_set().clone())
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn recording_stops_when_full() {
        let config = SimulationConfig {
            record_capacity: 4,
            generator: GeneratorConfig {
                arrival_probability: 100,
                ..GeneratorConfig::default()
            },
            ..SimulationConfig::default()
        };
        let mut kernel = SimulatedKernel::with_capacity(64);
        let mut sim = Simulation::new(config, 3).unwrap();
        sim.install(&mut kernel).unwrap();
        let summary = sim.run(&mut kernel, 10).unwrap();
        assert_eq!(summary.created, 10);
        assert_eq!(summary.recorded, 4);
        assert_eq!(sim.task_set().aperiodic().len(), 4);
    }

    #[test]
    fn exhaustion_stops_the_run() {
        let config = SimulationConfig {
            generator: GeneratorConfig {
                arrival_probability: 100,
                ..GeneratorConfig::default()
            },
            ..SimulationConfig::default()
        };
        // four periodic tasks plus two aperiodic ones fit
        let mut kernel = SimulatedKernel::with_capacity(6);
        let mut sim = Simulation::new(config, 3).unwrap();
        sim.install(&mut kernel).unwrap();
        let result = sim.run(&mut kernel, 10);
        assert!(matches!(result, Err(KernelError::ResourceExhausted { .. })));
        assert_eq!(sim.releases(), 3);
        assert!(sim.generator().is_halted());
        assert_eq!(sim.step(&mut kernel), Ok(None));
        assert_eq!(kernel.tasks().len(), 6);
    }

    #[test]
    fn recorded_workload_can_be_reanalyzed() {
        let config = SimulationConfig {
            generator: GeneratorConfig {
                arrival_probability: 100,
                short_upper: 0,
                medium_wcet: s(1000),
                long_wcet: s(1000),
                ..GeneratorConfig::default()
            },
            ..SimulationConfig::default()
        };
        let mut kernel = SimulatedKernel::with_capacity(64);
        let mut sim = Simulation::new(config, 8).unwrap();
        sim.install(&mut kernel).unwrap();
        sim.run(&mut kernel, 3).unwrap();

        // a one-second task every second cannot finish before the next one arrives
        assert_eq!(sim.task_set().aperiodic()[0].wcet, s(1000));
        assert_eq!(
            sim.analyze(&Analyzer::default()),
            Verdict::infeasible(TaskRef::Aperiodic(0))
        );
        assert_eq!(sim.task_set().longest_period(), Some(d(5000)));
    }
}
