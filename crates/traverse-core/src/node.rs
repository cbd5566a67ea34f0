// Arena-friendly node data. RunnerNode itself holds no references to
// siblings - only indices into the RunnerGraph's arena - so the graph can be
// built and walked without Rc<RefCell<_>> cycles. The traversal and
// lifecycle algorithms that used to live on the node (forwards/reversed,
// execute, save_the_children, ...) are implemented as RunnerGraph methods
// taking a NodeId, since they need the whole arena to resolve parent and
// child indices.

use crate::attr::AttrValue;
use crate::status::Status;
use crate::task::Task;

pub type NodeId = usize;

pub struct RunnerNode {
    pub task: Box<dyn Task>,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    /// Presented attrs accumulated from parents, in parent-declaration
    /// order, applied to `task` via `patch_attrs` right before it runs.
    pub pending_attrs: Vec<(String, AttrValue)>,
    pub run_complete: bool,
    pub children_complete: bool,
    pub complete: bool,
}

impl RunnerNode {
    pub fn new(task: Box<dyn Task>, parents: Vec<NodeId>) -> Self {
        Self {
            task,
            parents,
            children: Vec::new(),
            pending_attrs: Vec::new(),
            run_complete: false,
            children_complete: false,
            complete: false,
        }
    }

    pub fn status(&self) -> Option<Status> {
        self.task.state().status
    }

    /// Reset a node to pre-run state, for `rerun_failures` and
    /// `RunnerGraph::reset`. The task itself is replaced with a fresh
    /// instance built from the same args (matching Task::clone semantics:
    /// status/context/teardown stack are not carried over).
    pub fn reset(&mut self) {
        self.task = self.task.clone_box();
        self.pending_attrs.clear();
        self.run_complete = false;
        self.children_complete = false;
        self.complete = false;
    }
}
