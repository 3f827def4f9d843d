/*! Reproducible synthesis of aperiodic workload.

Once per tick, an [AperiodicGenerator] decides whether an aperiodic
task arrives, picks its [DurationClass], and makes up a name for it.
All three decisions are drawn from a single seeded random source
owned by the generator, so two generators constructed with the same
seed produce identical request streams.
*/

use std::fmt;

use log::{debug, error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::kernel::{KernelError, TaskBody, TaskFactory, TaskHandle};
use crate::time::Service;

const NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Coarse execution-time class of a synthesized task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationClass {
    Short,
    Medium,
    Long,
}

impl DurationClass {
    /// Map a uniform draw from `[0, 100)` to a class: below
    /// `short_upper` is short, strictly above `long_lower` is long,
    /// everything in between is medium.
    ///
    /// With the default thresholds the long class needs a draw of at
    /// least 100 and is thus never chosen.
    pub fn classify(draw: u32, config: &GeneratorConfig) -> Self {
        if draw < config.short_upper {
            DurationClass::Short
        } else if draw > config.long_lower {
            DurationClass::Long
        } else {
            DurationClass::Medium
        }
    }

    /// The WCET assumed for tasks of this class.
    pub fn nominal_wcet(self, config: &GeneratorConfig) -> Service {
        match self {
            DurationClass::Short => config.short_wcet,
            DurationClass::Medium => config.medium_wcet,
            DurationClass::Long => config.long_wcet,
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationClass::Short => write!(f, "short"),
            DurationClass::Medium => write!(f, "medium"),
            DurationClass::Long => write!(f, "long"),
        }
    }
}

/// Error type returned when a [GeneratorConfig] is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a percentage, got {value}")]
    NotAPercentage { name: &'static str, value: u32 },
    #[error("name length {length} leaves no room after prefix {prefix:?}")]
    NameTooShort { length: usize, prefix: String },
    #[error("name prefix {0:?} is not printable ASCII")]
    BadPrefix(String),
    #[error("nominal WCET of {0} tasks must be positive")]
    ZeroWcet(DurationClass),
}

/// Parameters of the arrival process. All probabilities are in percent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Chance that a task arrives in a given tick.
    pub arrival_probability: u32,
    /// Class draws below this value yield short tasks.
    pub short_upper: u32,
    /// Class draws above this value yield long tasks.
    pub long_lower: u32,
    pub name_prefix: String,
    /// Total length of generated names, prefix included.
    pub name_length: usize,
    pub short_wcet: Service,
    pub medium_wcet: Service,
    pub long_wcet: Service,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            arrival_probability: 80,
            short_upper: 80,
            long_lower: 99,
            name_prefix: "a-".to_string(),
            name_length: 10,
            short_wcet: Service::from_millis(50),
            medium_wcet: Service::from_millis(100),
            long_wcet: Service::from_millis(1000),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("arrival probability", self.arrival_probability),
            ("short task threshold", self.short_upper),
            ("long task threshold", self.long_lower),
        ] {
            if value > 100 {
                return Err(ConfigError::NotAPercentage { name, value });
            }
        }
        if !self.name_prefix.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::BadPrefix(self.name_prefix.clone()));
        }
        if self.name_length <= self.name_prefix.len() {
            return Err(ConfigError::NameTooShort {
                length: self.name_length,
                prefix: self.name_prefix.clone(),
            });
        }
        for class in [DurationClass::Short, DurationClass::Medium, DurationClass::Long] {
            if class.nominal_wcet(self).is_none() {
                return Err(ConfigError::ZeroWcet(class));
            }
        }
        Ok(())
    }
}

/// A request to create one aperiodic task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AperiodicRequest {
    /// The tick in which the task arrived.
    pub tick: u64,
    pub class: DurationClass,
    pub name: String,
}

/// Seeded stochastic source of [AperiodicRequest]s.
///
/// The generator halts when the kernel runs out of resources and
/// stays halted until [AperiodicGenerator::reset] is called.
#[derive(Debug, Clone)]
pub struct AperiodicGenerator<R = StdRng> {
    config: GeneratorConfig,
    rng: R,
    ticks: u64,
    halted: bool,
}

impl AperiodicGenerator<StdRng> {
    /// A generator with the default configuration.
    pub fn new(seed: u64) -> Self {
        AperiodicGenerator {
            config: GeneratorConfig::default(),
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
            halted: false,
        }
    }

    pub fn with_config(config: GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AperiodicGenerator<R> {
    /// A generator drawing from an explicitly provided random source.
    pub fn from_rng(config: GeneratorConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(AperiodicGenerator {
            config,
            rng,
            ticks: 0,
            halted: false,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stop issuing requests.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Resume issuing requests after a halt.
    pub fn reset(&mut self) {
        self.halted = false;
    }

    fn percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }

    fn random_name(&mut self) -> String {
        let mut name = String::with_capacity(self.config.name_length);
        name.push_str(&self.config.name_prefix);
        for _ in self.config.name_prefix.len()..self.config.name_length {
            let key = self.rng.gen_range(0..NAME_CHARSET.len());
            name.push(NAME_CHARSET[key] as char);
        }
        name
    }

    /// Advance by one tick and decide whether an aperiodic task
    /// arrives in it.
    pub fn tick(&mut self, tick: u64) -> Option<AperiodicRequest> {
        self.ticks += 1;
        if self.halted || self.percent() >= self.config.arrival_probability {
            return None;
        }
        let class = DurationClass::classify(self.percent(), &self.config);
        let name = self.random_name();
        debug!("tick {}: {} aperiodic task {} arrives", tick, class, name);
        Some(AperiodicRequest { tick, class, name })
    }

    /// Advance by one tick and hand the resulting request, if any, to
    /// `factory`.
    ///
    /// A [KernelError] is returned as is, without retrying, and halts
    /// the generator.
    pub fn submit<F>(
        &mut self,
        tick: u64,
        factory: &mut F,
    ) -> Result<Option<(AperiodicRequest, TaskHandle)>, KernelError>
    where
        F: TaskFactory + ?Sized,
    {
        let request = match self.tick(tick) {
            Some(request) => request,
            None => return Ok(None),
        };
        match factory.create_aperiodic(TaskBody::Busy(request.class), &request.name) {
            Ok(handle) => Ok(Some((request, handle))),
            Err(e) => {
                error!("tick {}: cannot create {}: {}", tick, request.name, e);
                self.halt();
                Err(e)
            }
        }
    }
}
