/*! The seam towards the preemptive kernel that actually runs tasks.

The kernel itself is not part of this crate. [TaskFactory] captures
the two creation calls the workload needs; [SimulatedKernel] is an
in-memory stand-in with a bounded task table, used for simulation
and tests.

Running out of kernel resources is fatal. Creation calls report it as
[KernelError::ResourceExhausted]; the one place that turns it into
process termination is [exit_on_exhaustion].
*/

use std::panic::Location;
use std::process;

use derive_more::{Display, From, Into};
use log::{debug, error};
use thiserror::Error;

use crate::generator::DurationClass;
use crate::model::TaskKind;
use crate::time::Duration;

/// Opaque identifier of a task created by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into, Display)]
pub struct TaskHandle(u32);

/// Kernel scheduling priority; larger values are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into, Display)]
pub struct Priority(u32);

/// The priority of the kernel's idle task.
pub const IDLE_PRIORITY: Priority = Priority(0);

impl Priority {
    /// The priority `levels` steps above idle.
    pub const fn above_idle(levels: u32) -> Self {
        Priority(IDLE_PRIORITY.0 + levels)
    }
}

/// The code a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBody {
    /// Busy work for the duration of the given class.
    Busy(DurationClass),
    /// The task that injects aperiodic workload once per release.
    AperiodicSeeder,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    #[error("out of memory creating a task at {call_site}")]
    ResourceExhausted {
        call_site: &'static Location<'static>,
    },
}

/// Creates kernel tasks on behalf of the workload.
pub trait TaskFactory {
    fn create_periodic(
        &mut self,
        body: TaskBody,
        name: &str,
        priority: Priority,
        period: Duration,
    ) -> Result<TaskHandle, KernelError>;

    fn create_aperiodic(&mut self, body: TaskBody, name: &str) -> Result<TaskHandle, KernelError>;
}

/// Book-keeping record of a task created by [SimulatedKernel].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelTask {
    pub handle: TaskHandle,
    pub name: String,
    pub body: TaskBody,
    pub kind: TaskKind,
    pub priority: Priority,
    /// `None` for aperiodic tasks.
    pub period: Option<Duration>,
}

/// A [TaskFactory] that only records the tasks it is asked to create.
///
/// The task table has a fixed capacity; once it is full, every
/// further creation call fails with
/// [ResourceExhausted][KernelError::ResourceExhausted], just like a
/// kernel whose heap is exhausted.
#[derive(Debug, Clone)]
pub struct SimulatedKernel {
    capacity: usize,
    tasks: Vec<KernelTask>,
}

impl SimulatedKernel {
    pub fn with_capacity(capacity: usize) -> Self {
        SimulatedKernel {
            capacity,
            tasks: Vec::new(),
        }
    }

    /// Change the size of the task table. Existing tasks are kept
    /// even if they no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn tasks(&self) -> &[KernelTask] {
        &self.tasks
    }

    pub fn task(&self, handle: TaskHandle) -> Option<&KernelTask> {
        self.tasks.iter().find(|t| t.handle == handle)
    }

    #[track_caller]
    fn allocate(
        &mut self,
        body: TaskBody,
        name: &str,
        kind: TaskKind,
        priority: Priority,
        period: Option<Duration>,
    ) -> Result<TaskHandle, KernelError> {
        if self.tasks.len() >= self.capacity {
            return Err(KernelError::ResourceExhausted {
                call_site: Location::caller(),
            });
        }
        let handle = TaskHandle(self.tasks.len() as u32 + 1);
        debug!("created {} task {} ({})", kind, name, handle);
        self.tasks.push(KernelTask {
            handle,
            name: name.to_string(),
            body,
            kind,
            priority,
            period,
        });
        Ok(handle)
    }
}

impl TaskFactory for SimulatedKernel {
    #[track_caller]
    fn create_periodic(
        &mut self,
        body: TaskBody,
        name: &str,
        priority: Priority,
        period: Duration,
    ) -> Result<TaskHandle, KernelError> {
        self.allocate(body, name, TaskKind::Periodic, priority, Some(period))
    }

    #[track_caller]
    fn create_aperiodic(&mut self, body: TaskBody, name: &str) -> Result<TaskHandle, KernelError> {
        // aperiodic tasks run just above idle
        self.allocate(body, name, TaskKind::Aperiodic, IDLE_PRIORITY, None)
    }
}

/// Unwrap `result`, or report the failing call site and terminate the
/// process with status -1 if the kernel ran out of resources.
///
/// Wrap the top-level kernel-facing calls with it:
///
/// ```
/// use rm_feasibility::kernel::{exit_on_exhaustion, SimulatedKernel};
/// use rm_feasibility::simulation::{Simulation, SimulationConfig};
///
/// let mut kernel = SimulatedKernel::with_capacity(64);
/// let mut sim = Simulation::new(SimulationConfig::default(), 42).unwrap();
/// exit_on_exhaustion(sim.install(&mut kernel));
/// let summary = exit_on_exhaustion(sim.run(&mut kernel, 20));
/// assert_eq!(summary.releases, 20);
/// ```
pub fn exit_on_exhaustion<T>(result: Result<T, KernelError>) -> T {
    match result {
        Ok(value) => value,
        Err(KernelError::ResourceExhausted { call_site }) => {
            error!("[ASSERT] {}:{}", call_site.file(), call_site.line());
            process::exit(-1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::d;

    #[test]
    fn records_created_tasks() {
        let mut kernel = SimulatedKernel::with_capacity(4);
        let p = kernel
            .create_periodic(
                TaskBody::Busy(DurationClass::Medium),
                "p-mt-5",
                Priority::above_idle(5),
                d(1000),
            )
            .unwrap();
        let a = kernel
            .create_aperiodic(TaskBody::Busy(DurationClass::Short), "a-xyz")
            .unwrap();
        assert_ne!(p, a);

        let periodic = kernel.task(p).unwrap();
        assert_eq!(periodic.name, "p-mt-5");
        assert_eq!(periodic.kind, TaskKind::Periodic);
        assert_eq!(periodic.priority, Priority::from(5));
        assert_eq!(periodic.period, Some(d(1000)));

        let aperiodic = kernel.task(a).unwrap();
        assert_eq!(aperiodic.kind, TaskKind::Aperiodic);
        assert_eq!(aperiodic.priority, IDLE_PRIORITY);
        assert_eq!(aperiodic.period, None);
    }

    #[test]
    fn exhaustion_names_call_site() {
        let mut kernel = SimulatedKernel::with_capacity(0);
        let line = line!() + 1;
        let err = kernel.create_aperiodic(TaskBody::AperiodicSeeder, "a-1");
        match err {
            Err(KernelError::ResourceExhausted { call_site }) => {
                assert_eq!(call_site.file(), file!());
                assert_eq!(call_site.line(), line);
            }
            Ok(_) => panic!("task table should be full"),
        }
        assert!(kernel.tasks().is_empty());
        assert_eq!(exit_on_exhaustion(Ok::<_, KernelError>(7)), 7);
    }
}
