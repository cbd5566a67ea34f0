// The metaclass-equivalent: rather than a registration-time reflection pass
// over class bodies, each concrete Task declares its own merged metadata
// once, lazily, via `TaskMetaBuilder`. `.inherit(Parent::meta())` replays the
// merge a metaclass would have done automatically.

use crate::task::Task;
use std::collections::BTreeMap;

/// The declared type of an ARGUMENTS entry. Used only for documentation and
/// by `args_from_str` callers that want to validate before constructing a
/// Task; the engine itself does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

/// Knows how to build a parent Task instance from a (possibly restricted)
/// set of args, without the caller needing to name the concrete type.
/// Replaces the base-class walk a Python metaclass would perform.
#[derive(Clone, Copy)]
pub struct ParentSpec {
    pub type_name: &'static str,
    pub meta: fn() -> &'static TaskMeta,
    pub construct: fn(traverse_sdk::ArgMap) -> Box<dyn Task>,
}

impl ParentSpec {
    pub fn of<T: Task + 'static>() -> Self {
        ParentSpec {
            type_name: T::type_name(),
            meta: T::meta,
            construct: |args| Box::new(T::from_args(args)),
        }
    }
}

/// Per-Task-type metadata computed once and shared by every instance,
/// mirroring what a metaclass would have baked into the class object: the
/// merged argument schema, config defaults, presented attribute names,
/// parent task types, and debug hook names.
#[derive(Clone)]
pub struct TaskMeta {
    pub arguments: BTreeMap<String, ArgKind>,
    pub config_defaults: serde_json::Value,
    pub presented_attrs: Vec<String>,
    pub discover: bool,
    pub debug_fcns: Vec<String>,
    pub parents: Vec<ParentSpec>,
    pub setup_defined: bool,
    pub run_defined: bool,
}

impl std::fmt::Debug for TaskMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskMeta")
            .field("arguments", &self.arguments)
            .field("presented_attrs", &self.presented_attrs)
            .field("discover", &self.discover)
            .field("debug_fcns", &self.debug_fcns)
            .field("parents", &self.parents.iter().map(|p| p.type_name).collect::<Vec<_>>())
            .field("setup_defined", &self.setup_defined)
            .field("run_defined", &self.run_defined)
            .finish()
    }
}

#[derive(Default)]
pub struct TaskMetaBuilder {
    arguments: BTreeMap<String, ArgKind>,
    config_defaults: serde_json::Value,
    presented_attrs: Vec<String>,
    discover: bool,
    debug_fcns: Vec<String>,
    parents: Vec<ParentSpec>,
    setup_defined: bool,
    run_defined: bool,
}

impl TaskMetaBuilder {
    pub fn new() -> Self {
        Self {
            config_defaults: serde_json::Value::Object(Default::default()),
            discover: true,
            ..Default::default()
        }
    }

    /// Fold a parent class's merged metadata in, the way a metaclass walking
    /// MRO would: parent arguments/config/presented-attrs/debug-fns are
    /// inherited first, and the child's own declarations (applied after
    /// this call) take precedence on key collisions.
    pub fn inherit(mut self, parent: &TaskMeta) -> Self {
        for (name, kind) in &parent.arguments {
            self.arguments.entry(name.clone()).or_insert(*kind);
        }
        if let (serde_json::Value::Object(mine), serde_json::Value::Object(theirs)) =
            (&mut self.config_defaults, &parent.config_defaults)
        {
            for (k, v) in theirs {
                mine.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        for attr in &parent.presented_attrs {
            if !self.presented_attrs.contains(attr) {
                self.presented_attrs.push(attr.clone());
            }
        }
        for name in &parent.debug_fcns {
            if !self.debug_fcns.contains(name) {
                self.debug_fcns.push(name.clone());
            }
        }
        self
    }

    pub fn argument(mut self, name: &str, kind: ArgKind) -> Self {
        self.arguments.insert(name.to_string(), kind);
        self
    }

    pub fn config_default(mut self, key: &str, value: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = &mut self.config_defaults {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn presented_attr(mut self, name: &str) -> Self {
        if !self.presented_attrs.iter().any(|a| a == name) {
            self.presented_attrs.push(name.to_string());
        }
        self
    }

    pub fn discover(mut self, discover: bool) -> Self {
        self.discover = discover;
        self
    }

    pub fn debug_fn(mut self, name: &str) -> Self {
        if !self.debug_fcns.iter().any(|d| d == name) {
            self.debug_fcns.push(name.to_string());
        }
        self
    }

    pub fn parent(mut self, spec: ParentSpec) -> Self {
        self.parents.push(spec);
        self
    }

    pub fn setup_defined(mut self, v: bool) -> Self {
        self.setup_defined = v;
        self
    }

    pub fn run_defined(mut self, v: bool) -> Self {
        self.run_defined = v;
        self
    }

    pub fn build(mut self) -> TaskMeta {
        self.presented_attrs.sort();
        self.presented_attrs.dedup();
        TaskMeta {
            arguments: self.arguments,
            config_defaults: self.config_defaults,
            presented_attrs: self.presented_attrs,
            discover: self.discover,
            debug_fcns: self.debug_fcns,
            parents: self.parents,
            setup_defined: self.setup_defined,
            run_defined: self.run_defined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_merges_presented_attrs_and_child_args_win_ties() {
        let parent = TaskMetaBuilder::new()
            .argument("x", ArgKind::Int)
            .presented_attr("result")
            .build();
        let child = TaskMetaBuilder::new()
            .inherit(&parent)
            .argument("x", ArgKind::Str)
            .argument("y", ArgKind::Bool)
            .presented_attr("extra")
            .build();
        assert_eq!(child.arguments.get("x"), Some(&ArgKind::Str));
        assert_eq!(child.arguments.get("y"), Some(&ArgKind::Bool));
        assert_eq!(child.presented_attrs, vec!["extra", "result"]);
    }
}
