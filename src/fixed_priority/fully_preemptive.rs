use crate::demand::RequestBound;
use crate::fixed_point;
use crate::time::{Duration, Service};

/// Try to find a response-time bound for a task under
/// fully-preemptive fixed-priority scheduling on a dedicated
/// uniprocessor.
///
/// The analysis assumes that all tasks are independent and released
/// synchronously. The total higher-priority interference is
/// represented by `interference`, the task under analysis by its
/// WCET `task_under_analysis_wcet`. The classic response-time
/// equation
///
/// `R = C + interference(R)`
///
/// is solved by fixed-point iteration starting at `R = C`. If no
/// fixed point is found that does not exceed `deadline`, return a
/// [SearchFailure][fixed_point::SearchFailure] instead; for tasks
/// with implicit deadlines this is exactly the infeasibility
/// condition.
pub fn dedicated_uniproc_rta<RBF>(
    interference: &RBF,
    task_under_analysis_wcet: Service,
    deadline: Duration,
) -> fixed_point::SearchResult
where
    RBF: RequestBound + ?Sized,
{
    fixed_point::search(
        Duration::from(task_under_analysis_wcet),
        deadline,
        |r| task_under_analysis_wcet + interference.service_needed(r),
    )
}
