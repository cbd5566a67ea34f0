//! The `Emitter` contract: an external sink for lifecycle and log events.
//! The engine only ever calls through this trait; rendering is opaque to it.

use crate::log_level::LogLevel;
use std::fs::File;
use std::io;

/// A stable, displayable identity for a running Task, passed to emitters so
/// they can key per-task state (e.g. a results table) without depending on
/// the concrete Task type.
pub trait TaskHandle: Send + Sync + std::fmt::Debug {
    /// The node key: `<fully-qualified-class>.<str(task)>`.
    fn identity(&self) -> &str;
    /// `str(task)` — `ClassName(k1=repr(v1),...)`.
    fn display(&self) -> String;
}

/// External sink for lifecycle and log events. Implementors must tolerate
/// being called only from sequential call sites (the engine is
/// single-threaded) but must be reentrant across nested subcontexts.
pub trait Emitter: Send + Sync {
    /// Called before each `execute_run` and each `execute_teardown`.
    fn start_task(&self, task: &dyn TaskHandle);

    /// Called after each `execute_teardown` completes, even on error.
    fn end_task(&self, _task: &dyn TaskHandle) {}

    /// Called when a nested scope opens; increment internal nesting.
    fn subcontext(&self);

    /// Called when scope(s) close; reset nesting to `level`.
    fn pop_subcontext(&self, level: usize);

    /// `level` is one of DEBUG/PROCEDURE/INFO/SKIP/SUCCESS/ERROR/FAIL/CATASTROPHIC.
    /// Multi-line text preserves indentation per emitter policy.
    fn log_message(&self, level: LogLevel, text: &str);

    /// A Task logged a response payload.
    fn log_response(&self, _task: &dyn TaskHandle, _payload: &serde_json::Value) {}

    /// Open a per-task auxiliary file. Default discards to the null device.
    fn log_file(&self, _description: &str, _extension: &str) -> io::Result<File> {
        std::fs::OpenOptions::new()
            .write(true)
            .open(if cfg!(windows) { "NUL" } else { "/dev/null" })
    }

    /// Flush, close, emit summaries at run end.
    fn finalize(&self) {}
}
