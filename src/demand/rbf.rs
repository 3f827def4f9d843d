use crate::arrival::ArrivalBound;
use crate::time::{Duration, Service};

use super::RequestBound;

/// The canonical request-bound function (RBF), which connects an
/// arrival bound and a per-job WCET.
///
/// Given an arrival model and a WCET, the RBF bounds demand over an
/// interval of length `delta` simply as the total cumulative cost of
/// the maximum number of jobs that can arrive in an interval of
/// length `delta`.
#[derive(Clone, Debug)]
pub struct RBF<B: ArrivalBound> {
    pub wcet: Service,
    pub arrival_bound: B,
}

impl<B: ArrivalBound> RBF<B> {
    pub fn new(arrival_bound: B, wcet: Service) -> Self {
        RBF {
            wcet,
            arrival_bound,
        }
    }
}

impl<B: ArrivalBound> RequestBound for RBF<B> {
    fn service_needed(&self, delta: Duration) -> Service {
        match self.arrival_bound.number_arrivals(delta) {
            // the arrival count saturated, so the demand does too
            usize::MAX if !self.wcet.is_none() => Service::unbounded(),
            n => self.wcet * n as u64,
        }
    }
}
