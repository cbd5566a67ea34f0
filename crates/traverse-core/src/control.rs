// Control-flow signals, modeled as explicit result variants instead of
// unwinding exceptions, per the engine's own design guidance: FinishRun and
// StopRun are unwinding signals caught only by the top-level run loop, and
// TaskSkip/TaskFail/TaskError classify what a Task's setup/run raised.

use std::fmt;

/// Raised by `RunnerNode::update_status` when `failfast` triggers, or by
/// `execute_teardown` when a teardown goes CATASTROPHIC. Caught only by
/// `RunnerGraph::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// `failfast` triggered on a non-skip status.
    FinishRun,
    /// A teardown produced CATASTROPHIC.
    StopRun,
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSignal::FinishRun => write!(f, "FinishRun"),
            ControlSignal::StopRun => write!(f, "StopRun"),
        }
    }
}

/// Result type threaded through the node-execution algorithms: `Ok` carries
/// the normal return value, `Err` is a control signal unwinding to the
/// top-level loop.
pub type NodeResult<T> = Result<T, ControlSignal>;

/// What a Task's `setup`/`run` raised, classified the way `execute_run`
/// must: a skip sentinel, an assertion (FAIL), or any other error (ERROR).
#[derive(Debug)]
pub enum TaskOutcome {
    Skip(String),
    Fail(String),
    Error(anyhow::Error),
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Skip(msg) => write!(f, "skip: {msg}"),
            TaskOutcome::Fail(msg) => write!(f, "fail: {msg}"),
            TaskOutcome::Error(err) => write!(f, "error: {err}"),
        }
    }
}

impl std::error::Error for TaskOutcome {}

impl From<anyhow::Error> for TaskOutcome {
    fn from(err: anyhow::Error) -> Self {
        TaskOutcome::Error(err)
    }
}

/// Construct a `TaskSkip` outcome. Named as a free function so Task authors
/// can write `return Err(task_skip("missing config key"))` without
/// importing the enum variant path.
pub fn task_skip(reason: impl Into<String>) -> TaskOutcome {
    TaskOutcome::Skip(reason.into())
}

/// Construct a FAIL outcome (the assertion-failure equivalent).
pub fn task_fail(reason: impl Into<String>) -> TaskOutcome {
    TaskOutcome::Fail(reason.into())
}
