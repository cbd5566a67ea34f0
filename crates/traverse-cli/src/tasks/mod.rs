// A small demo Task hierarchy exercising parent/child attribute
// inheritance, for the `traverse` binary and as a worked example of the
// builder pattern concrete Task types are expected to follow.

pub mod prepare_workspace;
pub mod run_suite;

pub use prepare_workspace::PrepareWorkspace;
pub use run_suite::RunSuite;

use traverse_core::TaskRegistry;

/// Register every Task type this binary knows how to run. Stands in for
/// the module-discovery pass the original relied on.
pub fn register_all(registry: &mut TaskRegistry) {
    registry.register::<PrepareWorkspace>();
    registry.register::<RunSuite>();
}
