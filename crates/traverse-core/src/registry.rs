// Discovery, reimagined. The original walked Python modules at import time
// looking for Task subclasses; Rust has no equivalent reflection, so
// callers explicitly register the concrete Task types a binary knows about.
// A registry entry is exactly a `ParentSpec` (type name, metadata accessor,
// constructor) under a name a CLI or config file can ask for by string.

use crate::meta::ParentSpec;
use crate::task::Task;

pub struct TaskRegistration {
    pub type_name: &'static str,
    pub spec: ParentSpec,
}

#[derive(Default)]
pub struct TaskRegistry {
    entries: Vec<TaskRegistration>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Task + 'static>(&mut self) -> &mut Self {
        self.entries.push(TaskRegistration {
            type_name: T::type_name(),
            spec: ParentSpec::of::<T>(),
        });
        self
    }

    pub fn find(&self, type_name: &str) -> Option<&ParentSpec> {
        self.entries
            .iter()
            .find(|e| e.type_name == type_name)
            .map(|e| &e.spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskRegistration> {
        self.entries.iter()
    }

    /// Entries whose DISCOVER flag is set - the ones a blanket "run
    /// everything" invocation should pick up, as opposed to helper Tasks
    /// meant only to be reached as someone else's parent.
    pub fn discoverable(&self) -> impl Iterator<Item = &TaskRegistration> {
        self.entries.iter().filter(|e| (e.spec.meta)().discover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use crate::meta::TaskMetaBuilder;
    use crate::task::TaskState;
    use once_cell::sync::Lazy;
    use traverse_sdk::ArgMap;

    #[derive(Debug)]
    struct Probe {
        args: ArgMap,
        state: TaskState,
    }

    static PROBE_META: Lazy<crate::meta::TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());

    impl Task for Probe {
        fn from_args(args: ArgMap) -> Self {
            Probe {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static crate::meta::TaskMeta {
            &PROBE_META
        }
        fn type_name() -> &'static str {
            "registry_tests.Probe"
        }
        fn class_name() -> &'static str {
            "Probe"
        }
        fn dyn_meta(&self) -> &'static crate::meta::TaskMeta {
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Probe::from_args(self.args.clone()))
        }
    }

    #[test]
    fn registered_type_is_findable_by_name() {
        let mut registry = TaskRegistry::new();
        registry.register::<Probe>();
        assert!(registry.find("registry_tests.Probe").is_some());
        assert!(registry.find("nope").is_none());
    }
}
