/*! Discrete time model used throughout the crate.

All quantities are integral numbers of milliseconds. The three
newtypes only exist to keep points in time, interval lengths, and
amounts of processor service apart at the type level; there is no
implicit conversion between units.
*/

use std::ops::Mul;

use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};

/// The length of an interval, e.g., a period or a response time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Duration(u64);

/// A point in time, relative to the start of the analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into, Display,
)]
pub struct Instant(u64);

/// An amount of processor service, e.g., a WCET.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Sub,
    SubAssign,
    From,
    Into,
    Display,
)]
pub struct Service(u64);

impl Duration {
    pub const fn zero() -> Self {
        Duration(0)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Duration(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Number of (possibly partial) intervals of length `other`
    /// needed to cover `self`. `other` must be non-zero.
    pub fn ceil_div(self, other: Duration) -> u64 {
        self.0 / other.0 + (self.0 % other.0 > 0) as u64
    }
}

impl Instant {
    pub const fn zero() -> Self {
        Instant(0)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Instant(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// The distance from `earlier` to `self`, saturating at zero.
    pub fn since(self, earlier: Instant) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Service {
    pub const fn none() -> Self {
        Service(0)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Service(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The largest representable amount of service, which doubles as
    /// "unbounded" demand.
    pub const fn unbounded() -> Self {
        Service(u64::MAX)
    }

    pub fn is_unbounded(self) -> bool {
        self.0 == u64::MAX
    }
}

// All arithmetic on service saturates, so that unbounded bursts and
// overloaded sums yield "infinite" demand instead of wrapping around.
impl std::ops::Add for Service {
    type Output = Service;

    fn add(self, other: Service) -> Service {
        Service(self.0.saturating_add(other.0))
    }
}

impl std::ops::AddAssign for Service {
    fn add_assign(&mut self, other: Service) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Service {
    fn sum<I: Iterator<Item = Service>>(iter: I) -> Service {
        iter.fold(Service::none(), |total, s| total + s)
    }
}

impl<'a> std::iter::Sum<&'a Service> for Service {
    fn sum<I: Iterator<Item = &'a Service>>(iter: I) -> Service {
        iter.copied().sum()
    }
}

impl Mul<u64> for Service {
    type Output = Service;

    fn mul(self, n: u64) -> Service {
        Service(self.0.saturating_mul(n))
    }
}

// On a dedicated uniprocessor, a given amount of service takes
// exactly as long to provide, and vice versa.
impl From<Service> for Duration {
    fn from(s: Service) -> Self {
        Duration(s.0)
    }
}

impl From<Duration> for Service {
    fn from(d: Duration) -> Self {
        Service(d.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_arithmetic_saturates() {
        let half = Service::from_millis(1 << 63);
        assert!((half + half).is_unbounded());
        assert_eq!(half * 3, Service::unbounded());

        let mut acc = Service::from_millis(u64::MAX - 1);
        acc += Service::from_millis(5);
        assert_eq!(acc, Service::unbounded());

        let total: Service = vec![half, half, Service::from_millis(1)].into_iter().sum();
        assert!(total.is_unbounded());
        let small: Service = [Service::from_millis(2), Service::from_millis(3)].iter().sum();
        assert_eq!(small, Service::from_millis(5));
        assert!(!small.is_unbounded());
    }

    #[test]
    fn ceil_div_rounds_up() {
        let d = Duration::from_millis;
        assert_eq!(d(10).ceil_div(d(5)), 2);
        assert_eq!(d(11).ceil_div(d(5)), 3);
        assert_eq!(d(0).ceil_div(d(5)), 0);
        assert_eq!(d(u64::MAX).ceil_div(d(1)), u64::MAX);
    }
}
