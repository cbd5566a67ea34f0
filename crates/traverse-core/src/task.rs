// The Task lifecycle engine. `Task` is the object-safe interface RunnerNode
// drives; `TaskState` is the bookkeeping every concrete Task embeds; the
// free functions at the bottom (`execute_run`, `execute_teardown`, ...) are
// the lifecycle engine itself, written once against `&mut dyn Task` instead
// of duplicated per concrete type.

use crate::attr::AttrValue;
use crate::context::RunContext;
use crate::control::TaskOutcome;
use crate::meta::TaskMeta;
use crate::status::Status;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use traverse_sdk::{ArgMap, LogLevel, TaskHandle};

/// A teardown callback. Returning `Err` marks the task CATASTROPHIC - the
/// one status `execute_teardown` never assigns on its own.
pub type TeardownFn = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// Opaque handle returned by `add_teardown`, used by `teardown_to_function`
/// to target a specific callback for cancellation. Identity only - callers
/// can't construct one themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownHandle(usize);

/// Bookkeeping fields every Task carries, matching the attributes on the
/// original Task base: status, error detail, its own context, timing, and
/// the LIFO teardown callback stack.
pub struct TaskState {
    pub status: Option<Status>,
    pub error: Option<String>,
    pub error_text: Option<String>,
    pub context: Arc<RunContext>,
    pub config: Option<serde_json::Value>,
    pub start_time: Option<DateTime<Utc>>,
    pub time_taken: Duration,
    pub teardown_stack: Vec<(TeardownHandle, TeardownFn)>,
    next_teardown_id: usize,
}

impl TaskState {
    pub fn new() -> Self {
        Self {
            status: None,
            error: None,
            error_text: None,
            context: Arc::new(RunContext::new()),
            config: None,
            start_time: None,
            time_taken: Duration::ZERO,
            teardown_stack: Vec::new(),
            next_teardown_id: 0,
        }
    }
}

impl Default for TaskState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskState")
            .field("status", &self.status)
            .field("error", &self.error)
            .field("time_taken", &self.time_taken)
            .field("teardown_depth", &self.teardown_stack.len())
            .finish()
    }
}

/// The object-safe surface `RunnerNode` drives. Concrete Task types
/// implement the type-specific handful (construction, identity, presented
/// attributes, `setup`/`run`); the lifecycle functions below are generic
/// over any `&mut dyn Task`.
pub trait Task: std::fmt::Debug + Send + Sync {
    fn from_args(args: ArgMap) -> Self
    where
        Self: Sized;
    fn meta() -> &'static TaskMeta
    where
        Self: Sized;
    fn type_name() -> &'static str
    where
        Self: Sized;
    fn class_name() -> &'static str
    where
        Self: Sized;

    fn dyn_meta(&self) -> &'static TaskMeta;
    fn dyn_type_name(&self) -> &'static str;
    fn dyn_class_name(&self) -> &'static str;

    fn args(&self) -> &ArgMap;
    fn state(&self) -> &TaskState;
    fn state_mut(&mut self) -> &mut TaskState;

    fn get_attr(&self, name: &str) -> Option<AttrValue>;
    fn set_attr(&mut self, name: &str, value: AttrValue);

    fn setup(&mut self) -> Result<(), TaskOutcome> {
        Ok(())
    }
    fn run(&mut self) -> Result<(), TaskOutcome> {
        Ok(())
    }

    /// Invoke the named debug hook (one of `dyn_meta().debug_fcns`) after a
    /// failed run. Concrete types override this to dispatch by name; the
    /// default ignores hooks it doesn't recognize.
    fn gather_debug(&mut self, name: &str) -> anyhow::Result<()> {
        let _ = name;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Task>;

    /// Look up a config value by dot-path, falling back to CONFIG_DEFAULTS
    /// when no config file was set, or when the file omits the key.
    fn get_config(
        &mut self,
        key: &str,
        skip_empty: bool,
    ) -> Result<Option<serde_json::Value>, TaskOutcome> {
        let mapping = self
            .state()
            .config
            .clone()
            .unwrap_or_else(|| self.dyn_meta().config_defaults.clone());
        let mut current = mapping;
        for segment in key.split('.') {
            match current.get(segment) {
                Some(serde_json::Value::Null) | None => {
                    return if skip_empty {
                        Err(TaskOutcome::Skip(format!(
                            "config key '{key}' is missing or null"
                        )))
                    } else {
                        Ok(None)
                    };
                }
                Some(next) => current = next.clone(),
            }
        }
        Ok(Some(current))
    }

    /// Apply `opts.config_filepath`, caching the loaded mapping locally so
    /// `get_config` doesn't reacquire the context's config lock per lookup.
    fn set_config_filepath(&mut self, path: PathBuf) {
        self.state().context.set_config_file(path);
        let mapping = self.state().context.config_mapping().ok();
        self.state_mut().config = mapping;
    }

    /// Receive attributes presented down from an ancestor. Any `Resource`
    /// value is re-pointed at this task's own context before assignment.
    fn patch_attrs(&mut self, new_attrs: &[(String, AttrValue)]) {
        let context = Arc::clone(&self.state().context);
        for (name, value) in new_attrs {
            if let AttrValue::Resource(resource) = value {
                resource.reparent(Arc::clone(&context));
            }
            self.set_attr(name, value.clone());
        }
    }

    /// Snapshot of the presented attributes this task currently exposes,
    /// in `dyn_meta().presented_attrs` order, for handing down to children.
    fn presented_attrs(&self) -> Vec<(String, AttrValue)> {
        self.dyn_meta()
            .presented_attrs
            .iter()
            .filter_map(|name| self.get_attr(name).map(|v| (name.clone(), v)))
            .collect()
    }
}

impl dyn Task {
    /// Register a teardown callback, LIFO: the most recently added callback
    /// runs first when `execute_teardown` drains the stack. Returning `Err`
    /// from the callback marks the task CATASTROPHIC. The returned handle
    /// can be passed to `teardown_to_function` to cancel-and-run the stack
    /// up through just this callback, ahead of the normal teardown phase.
    pub fn add_teardown(
        &mut self,
        f: impl FnMut() -> anyhow::Result<()> + Send + 'static,
    ) -> TeardownHandle {
        let state = self.state_mut();
        let handle = TeardownHandle(state.next_teardown_id);
        state.next_teardown_id += 1;
        state.teardown_stack.push((handle, Box::new(f)));
        handle
    }

    /// Pop and invoke callbacks, most recently added first, until and
    /// including the one matching `handle` - for cancelling a specific
    /// registered resource before the task's normal teardown phase runs.
    /// A callback reporting failure here marks the task CATASTROPHIC, same
    /// as `execute_teardown`. If the stack is drained without ever finding
    /// `handle`, that is a caller error (the handle was already consumed,
    /// or belongs to a different task) and this returns `Err` rather than
    /// silently doing nothing.
    pub fn teardown_to_function(&mut self, handle: TeardownHandle) -> anyhow::Result<()> {
        let mut first_err: Option<String> = None;
        loop {
            match self.state_mut().teardown_stack.pop() {
                Some((id, mut callback)) => {
                    if let Err(err) = callback() {
                        first_err.get_or_insert_with(|| err.to_string());
                    }
                    if id == handle {
                        break;
                    }
                }
                None => {
                    anyhow::bail!(
                        "teardown_to_function: handle not found on {}'s teardown stack",
                        self.dyn_class_name()
                    );
                }
            }
        }
        if let Some(reason) = first_err {
            self.state_mut().status = Some(Status::Catastrophic);
            self.state_mut().error_text = Some(reason.clone());
            anyhow::bail!(reason);
        }
        Ok(())
    }

    /// The `ClassName(k=v,...)` identity string, the task-identity repr.
    pub fn display_string(&self) -> String {
        format!(
            "{}({})",
            self.dyn_class_name(),
            self.args()
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",")
        )
    }

    /// A sized snapshot of this task's identity, for handing to an
    /// `Emitter` - trait objects can't be upcast from `dyn Task` to `dyn
    /// TaskHandle` directly, so this carries the two strings a `TaskHandle`
    /// needs instead.
    pub fn handle(&self) -> TaskIdentity {
        TaskIdentity {
            type_name: self.dyn_type_name(),
            display: self.display_string(),
        }
    }
}

/// See [`<dyn Task>::handle`].
#[derive(Debug)]
pub struct TaskIdentity {
    type_name: &'static str,
    display: String,
}

impl TaskHandle for TaskIdentity {
    fn identity(&self) -> &str {
        self.type_name
    }
    fn display(&self) -> String {
        self.display.clone()
    }
}

/// Run `setup` then `run`, classifying whatever they raise into the SKIP /
/// FAIL / ERROR taxonomy, stamping timing, and invoking any declared debug
/// hooks on failure. Never itself raises - failures are recorded onto the
/// task's status, not propagated. `_debug` is reserved for a future
/// interactive post-mortem step; it does not gate the debug hooks.
pub fn execute_run(task: &mut dyn Task, _debug: bool) {
    task.state_mut().start_time = Some(Utc::now());
    let context = Arc::clone(&task.state().context);
    context.start_task(&task.handle());

    let setup_result = {
        let _sc = context.subcontext("setup", LogLevel::Procedure);
        task.setup()
    };
    let run_result = match setup_result {
        Ok(()) => {
            let _sc = context.subcontext("run", LogLevel::Procedure);
            task.run()
        }
        Err(outcome) => Err(outcome),
    };

    match run_result {
        Ok(()) => {
            task.state_mut().status = Some(Status::Success);
            context.log_success(&format!("{} succeeded", task.dyn_class_name()));
        }
        Err(outcome) => {
            let (status, text) = match &outcome {
                TaskOutcome::Skip(msg) => (Status::Skip, msg.clone()),
                TaskOutcome::Fail(msg) => (Status::Fail, msg.clone()),
                TaskOutcome::Error(err) => (Status::Error, err.to_string()),
            };
            task.state_mut().status = Some(status);
            task.state_mut().error = Some(status.to_string());
            task.state_mut().error_text = Some(text.clone());
            context.log_message(
                level_for(status),
                &format!("{} {}: {}", task.dyn_class_name(), status, text),
            );
            if status != Status::Skip {
                let debug_fcns = task.dyn_meta().debug_fcns.clone();
                for name in debug_fcns {
                    let _sc = context.subcontext(&format!("debug: {name}"), LogLevel::Debug);
                    if let Err(err) = task.gather_debug(&name) {
                        context.log_debug(&format!("debug hook '{name}' itself failed: {err}"));
                    }
                }
            }
        }
    }

    if let Some(start) = task.state().start_time {
        let elapsed = Utc::now().signed_duration_since(start);
        if let Ok(std_elapsed) = elapsed.to_std() {
            task.state_mut().time_taken += std_elapsed;
        }
    }
}

fn level_for(status: Status) -> LogLevel {
    match status {
        Status::Skip => LogLevel::Skip,
        Status::Success => LogLevel::Success,
        Status::Fail => LogLevel::Fail,
        Status::Error => LogLevel::Error,
        Status::Catastrophic => LogLevel::Catastrophic,
    }
}

/// Drain the teardown stack LIFO. Any callback panicking is deliberately
/// not caught here - a teardown that panics is a programming error in the
/// Task, not a modeled outcome. A callback returning `Err` marks the task
/// CATASTROPHIC once the whole stack has drained; otherwise the status is
/// left as whatever `execute_run` already set (defaulting to SUCCESS if the
/// task never ran).
pub fn execute_teardown(task: &mut dyn Task) {
    let context = Arc::clone(&task.state().context);
    context.start_task(&task.handle());
    let _sc = context.subcontext("teardown", LogLevel::Procedure);

    let mut catastrophic_reason: Option<String> = None;
    while let Some((_, mut callback)) = task.state_mut().teardown_stack.pop() {
        if let Err(err) = callback() {
            catastrophic_reason.get_or_insert_with(|| err.to_string());
        }
    }

    match catastrophic_reason {
        Some(reason) => {
            task.state_mut().status = Some(Status::Catastrophic);
            task.state_mut().error_text = Some(reason.clone());
            context.log_catastrophic(&format!(
                "{} teardown failed catastrophically: {reason}",
                task.dyn_class_name()
            ));
        }
        None => {
            if task.state().status.is_none() {
                task.state_mut().status = Some(Status::Success);
            }
            context.log_info(&format!("{} finished", task.dyn_class_name()));
        }
    }
    context.end_task(&task.handle());
}

/// Mark the currently-running teardown as CATASTROPHIC - used by a
/// teardown callback that detects the environment is left in an unsafe
/// state (the one status `execute_teardown` itself never assigns).
pub fn mark_catastrophic(task: &mut dyn Task, reason: impl Into<String>) {
    task.state_mut().status = Some(Status::Catastrophic);
    task.state_mut().error_text = Some(reason.into());
}
