use super::RequestBound;
use crate::time::{Duration, Service};

/// A wrapper type for representing the total demand of the
/// individual demand sources in a slice (e.g., all higher-priority
/// tasks).
#[derive(Clone, Debug)]
pub struct Slice<'a, T> {
    slice: &'a [T],
}

impl<'a, T> Slice<'a, T> {
    pub fn of(slice: &'a [T]) -> Self {
        Slice { slice }
    }
}

impl<'a, T: RequestBound> RequestBound for Slice<'a, T> {
    fn service_needed(&self, delta: Duration) -> Service {
        self.slice.iter().map(|rbf| rbf.service_needed(delta)).sum()
    }
}
