use super::prepare_workspace::PrepareWorkspace;
use once_cell::sync::Lazy;
use traverse_core::{task_skip, ArgKind, AttrValue, ParentSpec, Task, TaskMeta, TaskMetaBuilder, TaskState};
use traverse_sdk::ArgMap;

static META: Lazy<TaskMeta> = Lazy::new(|| {
    TaskMetaBuilder::new()
        .argument("path", ArgKind::Str)
        .argument("suite", ArgKind::Str)
        .parent(ParentSpec::of::<PrepareWorkspace>())
        .setup_defined(true)
        .run_defined(true)
        .build()
});

/// Runs a named test suite inside whatever workspace `PrepareWorkspace`
/// presented. Skips (rather than fails) if no workspace was ever set -
/// demonstrates a task reading a parent's presented attribute.
#[derive(Debug)]
pub struct RunSuite {
    args: ArgMap,
    state: TaskState,
    workspace: Option<String>,
}

impl Task for RunSuite {
    fn from_args(args: ArgMap) -> Self {
        Self {
            args,
            state: TaskState::new(),
            workspace: None,
        }
    }

    fn meta() -> &'static TaskMeta {
        &META
    }
    fn type_name() -> &'static str {
        "traverse_cli.tasks.RunSuite"
    }
    fn class_name() -> &'static str {
        "RunSuite"
    }

    fn dyn_meta(&self) -> &'static TaskMeta {
        Self::meta()
    }
    fn dyn_type_name(&self) -> &'static str {
        Self::type_name()
    }
    fn dyn_class_name(&self) -> &'static str {
        Self::class_name()
    }

    fn args(&self) -> &ArgMap {
        &self.args
    }
    fn state(&self) -> &TaskState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn get_attr(&self, _name: &str) -> Option<AttrValue> {
        None
    }
    fn set_attr(&mut self, name: &str, value: AttrValue) {
        if name == "workspace" {
            if let AttrValue::Str(s) = value {
                self.workspace = Some(s);
            }
        }
    }

    fn run(&mut self) -> Result<(), traverse_core::TaskOutcome> {
        let workspace = self
            .workspace
            .clone()
            .ok_or_else(|| task_skip("no workspace was presented by a parent task"))?;
        let suite = match self.args.get("suite") {
            Some(traverse_sdk::ArgLiteral::Str(s)) => s.clone(),
            _ => "default".to_string(),
        };
        self.state
            .context
            .log_info(&format!("running suite '{suite}' in {workspace}"));
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(Self::from_args(self.args.clone()))
    }
}
