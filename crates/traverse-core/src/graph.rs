// The top-level scheduler. Builds an arena of RunnerNodes from a leaf
// Task's declared PARENTS, computes a parent-before-child execution order,
// and tears down each diverging branch as soon as it's no longer an
// ancestor of whatever runs next - so a long branch that failed early
// releases its resources without waiting for the rest of the graph.

use crate::control::{ControlSignal, NodeResult};
use crate::meta::ParentSpec;
use crate::node::{NodeId, RunnerNode};
use crate::options::RunOptions;
use crate::status::Status;
use crate::task::{self, Task};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use traverse_sdk::ArgMap;

fn node_key(type_name: &str, args: &ArgMap) -> String {
    let mut s = String::new();
    s.push_str(type_name);
    s.push('(');
    for (i, (k, v)) in args.sorted_pairs().into_iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(&v.to_string());
    }
    s.push(')');
    s
}

#[derive(Default)]
pub struct RunnerGraph {
    nodes: Vec<RunnerNode>,
    index: HashMap<String, NodeId>,
    roots: Vec<NodeId>,
}

impl RunnerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &RunnerNode {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Add a task, recursively building and deduplicating whatever parent
    /// tasks its declared PARENTS require, restricting each parent's args to
    /// only the keys its own ARGUMENTS schema declares. Returns the id of
    /// the task's own node; deduplicates against an existing node with the
    /// same type and (sorted) args.
    pub fn add_task<T: Task + 'static>(&mut self, args: ArgMap) -> NodeId {
        self.add_node(ParentSpec::of::<T>(), args)
    }

    /// Add a task by its `ParentSpec` rather than a compile-time type -
    /// what a registry-driven caller (the CLI) uses, since it only knows
    /// the type name at runtime.
    pub fn add_by_spec(&mut self, spec: ParentSpec, args: ArgMap) -> NodeId {
        self.add_node(spec, args)
    }

    fn add_node(&mut self, spec: ParentSpec, args: ArgMap) -> NodeId {
        let key = node_key(spec.type_name, &args);
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let meta = (spec.meta)();
        let mut parent_ids = Vec::with_capacity(meta.parents.len());
        for parent_spec in meta.parents.iter().copied() {
            let parent_meta = (parent_spec.meta)();
            let allowed: Vec<String> = parent_meta.arguments.keys().cloned().collect();
            let restricted = args.restrict_to(&allowed);
            parent_ids.push(self.add_node(parent_spec, restricted));
        }
        let task = (spec.construct)(args);
        let id = self.nodes.len();
        self.nodes.push(RunnerNode::new(task, parent_ids.clone()));
        self.index.insert(key, id);
        for &parent in &parent_ids {
            self.nodes[parent].children.push(id);
        }
        if parent_ids.is_empty() {
            self.roots.push(id);
        }
        id
    }

    /// Reset every node to pre-run state (fresh Task instances built from
    /// the same args).
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// Tear down any node that ran but was never reached by the normal
    /// outstanding-branch cleanup (a safety net after an aborted run).
    pub fn clean_graph(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            if self.nodes[id].run_complete && !self.nodes[id].complete {
                task::execute_teardown(self.nodes[id].task.as_mut());
                self.nodes[id].complete = true;
            }
        }
    }

    fn ancestors(&self, id: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            for &p in &self.nodes[n].parents {
                if seen.insert(p) {
                    stack.push(p);
                }
            }
        }
        seen
    }

    fn children_complete(&self, id: NodeId) -> bool {
        self.nodes[id].children.iter().all(|&c| self.nodes[c].run_complete)
    }

    /// Kahn's algorithm over the parent/child arena: every node appears
    /// after all of its parents. When `random_order`, ties among
    /// simultaneously-ready nodes are shuffled rather than FIFO.
    fn execution_order(&self, random_order: bool) -> Vec<NodeId> {
        let mut indegree: Vec<usize> = self.nodes.iter().map(|n| n.parents.len()).collect();
        let mut ready: Vec<NodeId> = (0..self.nodes.len()).filter(|&i| indegree[i] == 0).collect();
        if random_order {
            use rand::seq::SliceRandom;
            ready.shuffle(&mut rand::thread_rng());
        }
        let mut queue: VecDeque<NodeId> = ready.into();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let mut newly_ready = Vec::new();
            for &child in &self.nodes[id].children {
                indegree[child] -= 1;
                if indegree[child] == 0 {
                    newly_ready.push(child);
                }
            }
            if random_order {
                use rand::seq::SliceRandom;
                newly_ready.shuffle(&mut rand::thread_rng());
            }
            for c in newly_ready {
                queue.push_back(c);
            }
        }
        order
    }

    /// Tear down whatever in `executed` is not an ancestor of `next` and
    /// whose own children have all finished running, deepest (most
    /// recently executed) first so a node's children always tear down
    /// before the node itself. When `next` is `None` there is no further
    /// scheduling to come (a failfast abort, or the end of a pass), so
    /// every outstanding node is torn down unconditionally; no later sweep
    /// is coming to catch what this one skips.
    fn teardown_outstanding(
        &mut self,
        next: Option<NodeId>,
        executed: &mut Vec<NodeId>,
    ) -> NodeResult<()> {
        let keep = next.map(|n| self.ancestors(n)).unwrap_or_default();
        let mut remaining = Vec::new();
        for &candidate in executed.iter().rev() {
            if keep.contains(&candidate) || (next.is_some() && !self.children_complete(candidate)) {
                remaining.push(candidate);
                continue;
            }
            self.nodes[candidate].children_complete = true;
            task::execute_teardown(self.nodes[candidate].task.as_mut());
            self.nodes[candidate].complete = true;
            if self.nodes[candidate].status() == Some(Status::Catastrophic) {
                remaining.reverse();
                *executed = remaining;
                return Err(ControlSignal::StopRun);
            }
        }
        remaining.reverse();
        *executed = remaining;
        Ok(())
    }

    fn run_pass(&mut self, opts: &mut RunOptions) -> NodeResult<()> {
        let order = self.execution_order(opts.random_order);
        let mut executed: Vec<NodeId> = Vec::new();

        for (idx, &id) in order.iter().enumerate() {
            if self.nodes[id].run_complete {
                executed.push(id);
                continue;
            }

            let blocked = self.nodes[id]
                .parents
                .iter()
                .any(|&p| self.nodes[p].status().map(|s| !s.is_terminal_success()).unwrap_or(false));

            if blocked {
                let class_name = self.nodes[id].task.dyn_class_name().to_string();
                let context = Arc::clone(&self.nodes[id].task.state().context);
                self.nodes[id].task.state_mut().status = Some(Status::Skip);
                context.log_skip(&format!("{class_name} skipped: an ancestor did not succeed"));
            } else {
                let attrs = std::mem::take(&mut self.nodes[id].pending_attrs);
                self.nodes[id].task.patch_attrs(&attrs);
                if let Some(path) = opts.config_filepath.clone() {
                    self.nodes[id].task.set_config_filepath(path);
                }
                for emitter in &opts.emitters {
                    self.nodes[id]
                        .task
                        .state()
                        .context
                        .add_emitter(Arc::clone(emitter));
                }
                task::execute_run(self.nodes[id].task.as_mut(), opts.debug);
            }
            self.nodes[id].run_complete = true;
            executed.push(id);

            let presented = self.nodes[id].task.presented_attrs();
            if !presented.is_empty() {
                let children = self.nodes[id].children.clone();
                for child in children {
                    self.nodes[child].pending_attrs.extend(presented.clone());
                }
            }

            if let Some(cb) = opts.between_tasks.as_mut() {
                cb();
            }

            if opts.failfast {
                if let Some(status) = self.nodes[id].status() {
                    if !status.is_terminal_success() {
                        self.teardown_outstanding(None, &mut executed)?;
                        return Err(ControlSignal::FinishRun);
                    }
                }
            }

            let next = order.get(idx + 1).copied();
            self.teardown_outstanding(next, &mut executed)?;
        }

        self.teardown_outstanding(None, &mut executed)
    }

    fn descendants_closure(&self, seeds: &[NodeId]) -> HashSet<NodeId> {
        let mut seen: HashSet<NodeId> = seeds.iter().copied().collect();
        let mut stack: Vec<NodeId> = seeds.to_vec();
        while let Some(n) = stack.pop() {
            for &c in &self.nodes[n].children {
                if seen.insert(c) {
                    stack.push(c);
                }
            }
        }
        seen
    }

    /// Run every node to completion. On `rerun_failures`, any node (and its
    /// descendants, since their presented attrs may depend on it) that
    /// didn't reach a terminal-success status gets one more attempt.
    ///
    /// Returns true only if the *final* pass left every node in SKIP or
    /// SUCCESS - a node that failed on the first pass and was never
    /// retried (`rerun_failures` unset, or it failed again) counts against
    /// the overall result, it is not papered over by an earlier pass.
    pub fn run(&mut self, mut opts: RunOptions) -> bool {
        let mut signalled = false;

        if self.run_pass(&mut opts).is_err() {
            signalled = true;
        }

        if !signalled && opts.rerun_failures {
            let failed: Vec<NodeId> = (0..self.nodes.len())
                .filter(|&i| !self.nodes[i].status().map(|s| s.is_terminal_success()).unwrap_or(false))
                .collect();
            if !failed.is_empty() {
                for id in self.descendants_closure(&failed) {
                    self.nodes[id].reset();
                }
                if self.run_pass(&mut opts).is_err() {
                    signalled = true;
                }
            }
        }

        for emitter in &opts.emitters {
            emitter.finalize();
        }

        !signalled
            && self
                .nodes
                .iter()
                .all(|n| n.status().map(|s| s.is_terminal_success()).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use crate::meta::{ArgKind, TaskMetaBuilder};
    use crate::task::TaskState;
    use once_cell::sync::Lazy;
    use std::cell::RefCell;

    thread_local! {
        static LOG: RefCell<Vec<String>> = RefCell::new(Vec::new());
    }

    fn log(entry: impl Into<String>) {
        LOG.with(|l| l.borrow_mut().push(entry.into()));
    }

    fn take_log() -> Vec<String> {
        LOG.with(|l| std::mem::take(&mut *l.borrow_mut()))
    }

    macro_rules! leaf_task {
        ($name:ident, $type_name:literal) => {
            #[derive(Debug)]
            struct $name {
                args: ArgMap,
                state: TaskState,
            }
            impl Task for $name {
                fn from_args(args: ArgMap) -> Self {
                    Self {
                        args,
                        state: TaskState::new(),
                    }
                }
                fn meta() -> &'static TaskMeta {
                    static META: Lazy<TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());
                    &META
                }
                fn type_name() -> &'static str {
                    $type_name
                }
                fn class_name() -> &'static str {
                    stringify!($name)
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
                fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
                fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
                    log(concat!(stringify!($name), ":run"));
                    Ok(())
                }
                fn clone_box(&self) -> Box<dyn Task> {
                    Box::new(Self::from_args(self.args.clone()))
                }
            }
        };
    }

    leaf_task!(Root, "graph_tests.Root");

    #[derive(Debug)]
    struct Branch {
        args: ArgMap,
        state: TaskState,
    }
    impl Task for Branch {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| {
                TaskMetaBuilder::new()
                    .argument("name", ArgKind::Str)
                    .parent(ParentSpec::of::<Root>())
                    .build()
            });
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.Branch"
        }
        fn class_name() -> &'static str {
            "Branch"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            let name = match self.args.get("name") {
                Some(traverse_sdk::ArgLiteral::Str(s)) => s.clone(),
                _ => "branch".to_string(),
            };
            log(format!("Branch({name}):run"));
            let tag = name.clone();
            (&mut *self as &mut dyn Task).add_teardown(move || {
                log(format!("Branch({tag}):teardown"));
                Ok(())
            });
            Ok(())
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    fn args_with_name(name: &str) -> ArgMap {
        let mut args = ArgMap::new();
        args.insert("name", traverse_sdk::ArgLiteral::Str(name.to_string()));
        args
    }

    #[test]
    fn parent_runs_before_child_and_teardown_after() {
        take_log();
        let mut graph = RunnerGraph::new();
        graph.add_task::<Branch>(args_with_name("only"));
        let opts = RunOptions::default();
        assert!(graph.run(opts));
        let entries = take_log();
        assert_eq!(
            entries,
            vec![
                "Root:run".to_string(),
                "Branch(only):run".to_string(),
                "Branch(only):teardown".to_string(),
            ]
        );
    }

    #[test]
    fn diamond_shares_a_single_root_node() {
        take_log();
        let mut graph = RunnerGraph::new();
        graph.add_task::<Branch>(args_with_name("left"));
        graph.add_task::<Branch>(args_with_name("right"));
        assert_eq!(graph.len(), 3); // Root + two distinct Branch nodes, deduplicated.
        let opts = RunOptions::default();
        assert!(graph.run(opts));
        let entries = take_log();
        assert_eq!(entries.iter().filter(|e| *e == "Root:run").count(), 1);
    }

    #[derive(Debug)]
    struct FailingRoot {
        args: ArgMap,
        state: TaskState,
    }
    impl Task for FailingRoot {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.FailingRoot"
        }
        fn class_name() -> &'static str {
            "FailingRoot"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            log("FailingRoot:run");
            Err(crate::control::task_fail("always fails"))
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    #[derive(Debug)]
    struct ChildOfFailingRoot {
        args: ArgMap,
        state: TaskState,
    }
    impl Task for ChildOfFailingRoot {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| {
                TaskMetaBuilder::new()
                    .parent(ParentSpec::of::<FailingRoot>())
                    .build()
            });
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.ChildOfFailingRoot"
        }
        fn class_name() -> &'static str {
            "ChildOfFailingRoot"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            log("ChildOfFailingRoot:run");
            Ok(())
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    #[test]
    fn child_is_skipped_not_run_when_parent_fails() {
        take_log();
        let mut graph = RunnerGraph::new();
        let child = graph.add_task::<ChildOfFailingRoot>(ArgMap::new());
        let opts = RunOptions::default();
        assert!(!graph.run(opts));
        assert_eq!(graph.node(child).status(), Some(Status::Skip));
        assert!(!take_log().contains(&"ChildOfFailingRoot:run".to_string()));
    }

    #[test]
    fn failfast_stops_scheduling_further_nodes() {
        take_log();
        let mut graph = RunnerGraph::new();
        let child = graph.add_task::<ChildOfFailingRoot>(ArgMap::new());
        let mut opts = RunOptions::default();
        opts.failfast = true;
        assert!(!graph.run(opts));
        // Failfast aborts before the child is even visited - no status at all.
        assert_eq!(graph.node(child).status(), None);
    }

    #[derive(Debug)]
    struct FailingRootWithTeardown {
        args: ArgMap,
        state: TaskState,
    }
    impl Task for FailingRootWithTeardown {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.FailingRootWithTeardown"
        }
        fn class_name() -> &'static str {
            "FailingRootWithTeardown"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            log("FailingRootWithTeardown:run");
            (&mut *self as &mut dyn Task).add_teardown(|| {
                log("FailingRootWithTeardown:teardown");
                Ok(())
            });
            Err(crate::control::task_fail("always fails"))
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    #[test]
    fn failfast_tears_down_the_failing_node_itself() {
        take_log();
        let mut graph = RunnerGraph::new();
        graph.add_task::<FailingRootWithTeardown>(ArgMap::new());
        let mut opts = RunOptions::default();
        opts.failfast = true;
        assert!(!graph.run(opts));
        assert_eq!(
            take_log(),
            vec![
                "FailingRootWithTeardown:run".to_string(),
                "FailingRootWithTeardown:teardown".to_string(),
            ]
        );
    }

    #[derive(Debug)]
    struct FlakyThenOk {
        args: ArgMap,
        state: TaskState,
    }
    thread_local! {
        static FLAKY_ATTEMPTS: RefCell<u32> = RefCell::new(0);
    }
    impl Task for FlakyThenOk {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.FlakyThenOk"
        }
        fn class_name() -> &'static str {
            "FlakyThenOk"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            let attempt = FLAKY_ATTEMPTS.with(|a| {
                let mut a = a.borrow_mut();
                *a += 1;
                *a
            });
            if attempt < 2 {
                Err(crate::control::task_fail("not yet"))
            } else {
                Ok(())
            }
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    #[test]
    fn rerun_failures_retries_once_and_scores_the_final_pass() {
        FLAKY_ATTEMPTS.with(|a| *a.borrow_mut() = 0);
        let mut graph = RunnerGraph::new();
        let id = graph.add_task::<FlakyThenOk>(ArgMap::new());
        let mut opts = RunOptions::default();
        opts.rerun_failures = true;
        assert!(graph.run(opts));
        assert_eq!(graph.node(id).status(), Some(Status::Success));
    }

    #[test]
    fn without_rerun_failures_a_flaky_failure_counts_against_the_result() {
        FLAKY_ATTEMPTS.with(|a| *a.borrow_mut() = 0);
        let mut graph = RunnerGraph::new();
        graph.add_task::<FlakyThenOk>(ArgMap::new());
        let opts = RunOptions::default();
        assert!(!graph.run(opts));
    }

    #[derive(Debug)]
    struct CatastrophicOnTeardown {
        args: ArgMap,
        state: TaskState,
    }
    impl Task for CatastrophicOnTeardown {
        fn from_args(args: ArgMap) -> Self {
            Self {
                args,
                state: TaskState::new(),
            }
        }
        fn meta() -> &'static TaskMeta {
            static META: Lazy<TaskMeta> = Lazy::new(|| TaskMetaBuilder::new().build());
            &META
        }
        fn type_name() -> &'static str {
            "graph_tests.CatastrophicOnTeardown"
        }
        fn class_name() -> &'static str {
            "CatastrophicOnTeardown"
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
        fn set_attr(&mut self, _name: &str, _value: AttrValue) {}
        fn run(&mut self) -> Result<(), crate::control::TaskOutcome> {
            (&mut *self as &mut dyn Task).add_teardown(|| Err(anyhow::anyhow!("left a mount behind")));
            Ok(())
        }
        fn clone_box(&self) -> Box<dyn Task> {
            Box::new(Self::from_args(self.args.clone()))
        }
    }

    #[test]
    fn catastrophic_teardown_status_is_recorded() {
        let mut graph = RunnerGraph::new();
        let id = graph.add_task::<CatastrophicOnTeardown>(ArgMap::new());
        let opts = RunOptions::default();
        assert!(!graph.run(opts));
        assert_eq!(graph.node(id).status(), Some(Status::Catastrophic));
    }
}
