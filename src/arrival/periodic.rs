use super::{ArrivalBound, Sporadic};
use crate::time::Duration;

/// Classic jitter-free periodic arrival process as introduced by Liu & Layland.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Periodic {
    /// The exact separation between two job releases.
    pub period: Duration,
}

impl ArrivalBound for Periodic {
    fn number_arrivals(&self, delta: Duration) -> usize {
        usize::try_from(delta.ceil_div(self.period)).unwrap_or(usize::MAX)
    }
}

impl From<Sporadic> for Periodic {
    fn from(s: Sporadic) -> Self {
        Periodic {
            period: s.min_inter_arrival,
        }
    }
}
