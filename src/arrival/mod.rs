/*! Models of arrival processes.

This module provides a central trait, [ArrivalBound], which represents
an upper-bounding arrival curve, and the two arrival processes the
feasibility test needs: strictly [Periodic] tasks and the [Sporadic]
source used to bound aperiodic load.
*/

use auto_impl::auto_impl;

use crate::time::Duration;

/// The main interface for models describing arrival processes.
#[auto_impl(&, Box, Rc)]
pub trait ArrivalBound {
    /// Bound the number of jobs released in any interval of length `delta`.
    /// Counts that do not fit a `usize` saturate at `usize::MAX`.
    fn number_arrivals(&self, delta: Duration) -> usize;
}

mod periodic;
mod sporadic;

pub use periodic::Periodic;
pub use sporadic::Sporadic;

#[cfg(test)]
mod tests;
