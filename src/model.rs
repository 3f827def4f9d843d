/*! Bounded task-set model consumed by the feasibility test.

A [TaskSet] is built once per analysis run by appending periodic and
aperiodic task descriptors. Both collections are capacity-checked:
an insertion that would exceed the bound, or that describes an
impossible task, is rejected and leaves the set untouched.
*/

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::arrival::Periodic;
use crate::demand::RBF;
use crate::time::{Duration, Instant, Service};

/// Default bound on the number of tasks of each kind.
pub const MAX_TASKS: usize = 50;

/// A recurring task with an implicit deadline equal to its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    pub period: Duration,
    pub wcet: Service,
}

impl PeriodicTask {
    pub fn utilization(&self) -> f64 {
        self.wcet.as_millis() as f64 / self.period.as_millis() as f64
    }

    /// The request-bound function of this task.
    pub fn rbf(&self) -> RBF<Periodic> {
        RBF::new(
            Periodic {
                period: self.period,
            },
            self.wcet,
        )
    }
}

/// A one-shot task released at `arrival`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AperiodicTask {
    pub arrival: Instant,
    pub wcet: Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Periodic,
    Aperiodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Periodic => write!(f, "periodic"),
            TaskKind::Aperiodic => write!(f, "aperiodic"),
        }
    }
}

/// Error type returned when an insertion into a [TaskSet] is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskSetError {
    #[error("invalid task parameter: {reason}")]
    InvalidParameter { reason: &'static str },
    #[error("{kind} task capacity of {capacity} exceeded")]
    CapacityExceeded { kind: TaskKind, capacity: usize },
}

/// Periodic and aperiodic task descriptors, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    capacity: usize,
    periodic: Vec<PeriodicTask>,
    aperiodic: Vec<AperiodicTask>,
}

impl Default for TaskSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSet {
    /// An empty task set with room for [MAX_TASKS] tasks of each kind.
    pub fn new() -> Self {
        Self::with_capacity(MAX_TASKS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TaskSet {
            capacity,
            periodic: Vec::with_capacity(capacity),
            aperiodic: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn periodic(&self) -> &[PeriodicTask] {
        &self.periodic
    }

    pub fn aperiodic(&self) -> &[AperiodicTask] {
        &self.aperiodic
    }

    pub fn is_empty(&self) -> bool {
        self.periodic.is_empty() && self.aperiodic.is_empty()
    }

    /// Append a periodic task with the given period and WCET.
    pub fn add_periodic(&mut self, period: Duration, wcet: Service) -> Result<(), TaskSetError> {
        if self.periodic.len() >= self.capacity {
            return Err(TaskSetError::CapacityExceeded {
                kind: TaskKind::Periodic,
                capacity: self.capacity,
            });
        }
        if period.is_zero() {
            return Err(TaskSetError::InvalidParameter {
                reason: "period must be positive",
            });
        }
        if wcet.is_none() {
            return Err(TaskSetError::InvalidParameter {
                reason: "WCET must be positive",
            });
        }
        if Duration::from(wcet) > period {
            return Err(TaskSetError::InvalidParameter {
                reason: "WCET exceeds period",
            });
        }
        self.periodic.push(PeriodicTask { period, wcet });
        Ok(())
    }

    /// Append an aperiodic task arriving at `arrival` with the given WCET.
    pub fn add_aperiodic(&mut self, arrival: Instant, wcet: Service) -> Result<(), TaskSetError> {
        if self.aperiodic.len() >= self.capacity {
            return Err(TaskSetError::CapacityExceeded {
                kind: TaskKind::Aperiodic,
                capacity: self.capacity,
            });
        }
        if wcet.is_none() {
            return Err(TaskSetError::InvalidParameter {
                reason: "WCET must be positive",
            });
        }
        self.aperiodic.push(AperiodicTask { arrival, wcet });
        Ok(())
    }

    /// Total utilization of the periodic tasks.
    pub fn utilization(&self) -> f64 {
        self.periodic.iter().map(PeriodicTask::utilization).sum()
    }

    /// The longest period of any periodic task, if there is one.
    pub fn longest_period(&self) -> Option<Duration> {
        self.periodic.iter().map(|t| t.period).max()
    }

    /// Insertion indices of the periodic tasks in rate-monotonic
    /// priority order: shortest period first, ties broken by
    /// insertion order.
    pub fn rate_monotonic_order(&self) -> Vec<usize> {
        // sorted_by_key is stable, which takes care of ties
        (0..self.periodic.len())
            .sorted_by_key(|i| self.periodic[*i].period)
            .collect()
    }
}
