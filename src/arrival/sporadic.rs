use super::{ArrivalBound, Periodic};
use crate::time::Duration;

/// The sporadic arrival model (originally due to Mok), without jitter.
///
/// Jobs may arrive at any time, but two consecutive arrivals are
/// separated by at least `min_inter_arrival`. A zero separation
/// describes an unbounded burst.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sporadic {
    /// The minimum inter-arrival separation between any two job arrivals.
    pub min_inter_arrival: Duration,
}

impl Sporadic {
    pub fn new(min_inter_arrival: Duration) -> Self {
        Sporadic { min_inter_arrival }
    }
}

impl ArrivalBound for Sporadic {
    fn number_arrivals(&self, delta: Duration) -> usize {
        if delta.is_zero() {
            0
        } else if self.min_inter_arrival.is_zero() {
            usize::MAX
        } else {
            usize::try_from(delta.ceil_div(self.min_inter_arrival)).unwrap_or(usize::MAX)
        }
    }
}

impl From<Periodic> for Sporadic {
    fn from(p: Periodic) -> Self {
        Sporadic {
            min_inter_arrival: p.period,
        }
    }
}
