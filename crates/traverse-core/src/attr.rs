// The statically-typed "presented attributes" interface that replaces
// Python's dynamic getattr/setattr in `patch_attrs`. A `PresentedResource`
// is the rare case where the value itself needs to track whose context it
// currently belongs to (e.g. a handle that logs through the owning task).

use crate::context::RunContext;
use std::fmt;
use std::sync::Arc;

/// A dynamically-typed value a Task can present to its descendants, or
/// receive from an ancestor, via `get_attr`/`set_attr`.
#[derive(Clone)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Resource(Arc<dyn PresentedResource>),
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "Null"),
            AttrValue::Bool(v) => write!(f, "Bool({v})"),
            AttrValue::Int(v) => write!(f, "Int({v})"),
            AttrValue::Float(v) => write!(f, "Float({v})"),
            AttrValue::Str(v) => write!(f, "Str({v:?})"),
            AttrValue::Resource(_) => write!(f, "Resource(..)"),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Null, AttrValue::Null) => true,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Int(a), AttrValue::Int(b)) => a == b,
            (AttrValue::Float(a), AttrValue::Float(b)) => a == b,
            (AttrValue::Str(a), AttrValue::Str(b)) => a == b,
            (AttrValue::Resource(a), AttrValue::Resource(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A presented value that carries a reference to the context of whichever
/// task currently owns it (a live handle, not a plain value). `patch_attrs`
/// re-points this at the receiving task's own context before assignment, so
/// the resource keeps logging through whichever task is currently running.
pub trait PresentedResource: Send + Sync + fmt::Debug {
    fn reparent(&self, context: Arc<RunContext>);
}
