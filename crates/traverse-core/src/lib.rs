// traverse-core: the task traversal engine. Builds a dependency graph of
// Tasks from their declared parents, runs each node's setup/run/teardown
// lifecycle in parent-before-child order, and tears down diverging
// branches as soon as they're no longer relevant to what runs next.
//
// Layout:
//   RunnerGraph::add_task → RunnerGraph::run(RunOptions)
//     → per-node: task::execute_run → task::execute_teardown

pub mod attr;
pub mod context;
pub mod control;
pub mod graph;
pub mod meta;
pub mod node;
pub mod options;
pub mod registry;
pub mod status;
pub mod task;

pub use attr::{AttrValue, PresentedResource};
pub use context::{RunContext, Subcontext};
pub use control::{task_fail, task_skip, ControlSignal, NodeResult, TaskOutcome};
pub use graph::RunnerGraph;
pub use meta::{ArgKind, ParentSpec, TaskMeta, TaskMetaBuilder};
pub use node::{NodeId, RunnerNode};
pub use options::RunOptions;
pub use registry::{TaskRegistration, TaskRegistry};
pub use status::Status;
pub use task::{
    execute_run, execute_teardown, mark_catastrophic, Task, TaskState, TeardownFn, TeardownHandle,
};
