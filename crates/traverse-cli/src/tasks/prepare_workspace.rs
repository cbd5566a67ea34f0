use once_cell::sync::Lazy;
use traverse_core::{
    task_fail, ArgKind, AttrValue, Task, TaskMeta, TaskMetaBuilder, TaskState,
};
use traverse_sdk::ArgMap;

static META: Lazy<TaskMeta> = Lazy::new(|| {
    TaskMetaBuilder::new()
        .argument("path", ArgKind::Str)
        .presented_attr("workspace")
        .setup_defined(true)
        .run_defined(true)
        .build()
});

/// Creates (or validates) the working directory a test suite runs in, then
/// presents its resolved path to every descendant task.
#[derive(Debug)]
pub struct PrepareWorkspace {
    args: ArgMap,
    state: TaskState,
    workspace: Option<String>,
}

impl Task for PrepareWorkspace {
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
        "traverse_cli.tasks.PrepareWorkspace"
    }
    fn class_name() -> &'static str {
        "PrepareWorkspace"
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

    fn get_attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "workspace" => self.workspace.clone().map(AttrValue::Str),
            _ => None,
        }
    }
    fn set_attr(&mut self, name: &str, value: AttrValue) {
        if name == "workspace" {
            if let AttrValue::Str(s) = value {
                self.workspace = Some(s);
            }
        }
    }

    fn setup(&mut self) -> Result<(), traverse_core::TaskOutcome> {
        let path = match self.args.get("path") {
            Some(traverse_sdk::ArgLiteral::Str(s)) => s.clone(),
            _ => return Err(task_fail("PrepareWorkspace requires a string 'path' argument")),
        };
        self.workspace = Some(path);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(Self::from_args(self.args.clone()))
    }
}
