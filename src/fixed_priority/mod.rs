/*! Response-time analyses for fixed-priority scheduling on a
dedicated uniprocessor.

[fully_preemptive] bounds the response time of a periodic task under
preemption by all higher-priority tasks. [background] bounds the
aperiodic load of a task set as a sporadic source served at the
lowest priority level, below every periodic task.
*/

pub mod background;
pub mod fully_preemptive;
