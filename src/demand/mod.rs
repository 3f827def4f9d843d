/*! Models of processor demand.

A [RequestBound] bounds the total amount of processor service that
one or more sources of work may request in any interval of a given
length. The canonical instance is the request-bound function [RBF]
of a single task; [Slice] sums the demand of a set of tasks, e.g.,
all tasks of higher priority than the one under analysis.
*/

use auto_impl::auto_impl;

use crate::time::{Duration, Service};

/// The general interface for (arbitrarily shaped) processor demand.
/// This can represent the demand of a single task, or the cumulative
/// demand of multiple tasks.
#[auto_impl(&, Box, Rc)]
pub trait RequestBound {
    /// Bound the total amount of service needed in an interval of length `delta`.
    fn service_needed(&self, delta: Duration) -> Service;
}

mod rbf;
mod slice;

pub use rbf::RBF;
pub use slice::Slice;
