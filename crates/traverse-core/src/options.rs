// Knobs threaded through RunnerGraph::run. Not a Task attribute - this is
// the caller-facing surface of a single run.

use std::path::PathBuf;
use std::sync::Arc;
use traverse_sdk::Emitter;

pub struct RunOptions {
    /// Shuffle among nodes with no ordering dependency on each other,
    /// instead of running them in discovery/insertion order.
    pub random_order: bool,
    /// Config file applied to every task before it runs.
    pub config_filepath: Option<PathBuf>,
    pub emitters: Vec<Arc<dyn Emitter>>,
    /// Reserved for a future interactive post-mortem step. Failed tasks'
    /// debug hooks (`DEBUG_FCNS`) always run on failure regardless of this
    /// flag.
    pub debug: bool,
    /// Stop scheduling further nodes as soon as one finishes in a non
    /// terminal-success status.
    pub failfast: bool,
    /// After a full pass, reset and re-run any node that did not reach a
    /// terminal-success status, once.
    pub rerun_failures: bool,
    /// Invoked between each node's execution - a hook for progress
    /// reporting or throttling, not part of the lifecycle itself.
    pub between_tasks: Option<Box<dyn FnMut() + Send>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            random_order: false,
            config_filepath: None,
            emitters: Vec::new(),
            debug: false,
            failfast: false,
            rerun_failures: false,
            between_tasks: None,
        }
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("random_order", &self.random_order)
            .field("config_filepath", &self.config_filepath)
            .field("emitter_count", &self.emitters.len())
            .field("debug", &self.debug)
            .field("failfast", &self.failfast)
            .field("rerun_failures", &self.rerun_failures)
            .finish()
    }
}
