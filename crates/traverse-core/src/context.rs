// Per-run ambient state: nesting depth, attached emitters, and the config
// mapping. Every Task owns one of these (constructed fresh when its
// RunnerNode resets), and `RunnerNode::execute_run` attaches the configured
// emitters to it before each execution.

use parking_lot::Mutex;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use traverse_common::{ConfigError, ConfigStore, MultiFile};
use traverse_sdk::{Emitter, LogLevel, TaskHandle};

struct RunContextInner {
    log_position: usize,
    emitters: Vec<Arc<dyn Emitter>>,
    config: ConfigStore,
}

pub struct RunContext {
    inner: Mutex<RunContextInner>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunContextInner {
                log_position: 0,
                emitters: Vec::new(),
                config: ConfigStore::new(),
            }),
        }
    }

    pub fn add_emitter(&self, emitter: Arc<dyn Emitter>) {
        self.inner.lock().emitters.push(emitter);
    }

    pub fn set_config_file(&self, path: impl Into<PathBuf>) {
        self.inner.lock().config.set_filepath(path);
    }

    pub fn get_config(&self, key: &str) -> Result<Option<serde_json::Value>, ConfigError> {
        self.inner.lock().config.get(key)
    }

    /// The whole configured mapping, for callers (Task::set_config_filepath)
    /// that cache a copy of it locally rather than querying key-by-key.
    pub fn config_mapping(&self) -> Result<serde_json::Value, ConfigError> {
        self.inner.lock().config.root()
    }

    pub fn log_position(&self) -> usize {
        self.inner.lock().log_position
    }

    pub fn log_message(&self, level: LogLevel, text: &str) {
        for emitter in &self.inner.lock().emitters {
            emitter.log_message(level, text);
        }
    }

    pub fn log_debug(&self, text: &str) {
        self.log_message(LogLevel::Debug, text);
    }
    pub fn log_procedure(&self, text: &str) {
        self.log_message(LogLevel::Procedure, text);
    }
    pub fn log_info(&self, text: &str) {
        self.log_message(LogLevel::Info, text);
    }
    pub fn log_skip(&self, text: &str) {
        self.log_message(LogLevel::Skip, text);
    }
    pub fn log_success(&self, text: &str) {
        self.log_message(LogLevel::Success, text);
    }
    pub fn log_error(&self, text: &str) {
        self.log_message(LogLevel::Error, text);
    }
    pub fn log_fail(&self, text: &str) {
        self.log_message(LogLevel::Fail, text);
    }
    pub fn log_catastrophic(&self, text: &str) {
        self.log_message(LogLevel::Catastrophic, text);
    }

    pub fn start_task(&self, task: &dyn TaskHandle) {
        for emitter in &self.inner.lock().emitters {
            emitter.start_task(task);
        }
    }

    pub fn end_task(&self, task: &dyn TaskHandle) {
        for emitter in &self.inner.lock().emitters {
            emitter.end_task(task);
        }
    }

    pub fn log_response(&self, task: &dyn TaskHandle, payload: &serde_json::Value) {
        for emitter in &self.inner.lock().emitters {
            emitter.log_response(task, payload);
        }
    }

    pub fn log_file(&self, description: &str, extension: &str) -> io::Result<MultiFile> {
        let inner = self.inner.lock();
        let mut files: Vec<File> = Vec::with_capacity(inner.emitters.len());
        for emitter in &inner.emitters {
            files.push(emitter.log_file(description, extension)?);
        }
        Ok(MultiFile::new(files))
    }

    /// Open a subcontext: logs `message` at `level`, bumps nesting on every
    /// emitter, and returns a guard that restores nesting to the position
    /// captured *before* the bump, on every exit path (including panics).
    pub fn subcontext(self: &Arc<Self>, message: &str, level: LogLevel) -> Subcontext {
        self.log_message(level, message);
        let captured = {
            let mut inner = self.inner.lock();
            let captured = inner.log_position;
            inner.log_position += 1;
            for emitter in &inner.emitters {
                emitter.subcontext();
            }
            captured
        };
        Subcontext {
            context: Arc::clone(self),
            captured_position: captured,
        }
    }

    /// Set nesting back to `level` on every emitter and on this context's
    /// own position counter.
    pub fn pop_subcontext(&self, level: usize) {
        let mut inner = self.inner.lock();
        inner.log_position = level;
        for emitter in &inner.emitters {
            emitter.pop_subcontext(level);
        }
    }
}

/// RAII guard for a nested logging scope. Closing (drop) restores nesting
/// to the position captured when the scope was opened, on every exit path.
#[must_use]
pub struct Subcontext {
    context: Arc<RunContext>,
    captured_position: usize,
}

impl Drop for Subcontext {
    fn drop(&mut self) {
        self.context.pop_subcontext(self.captured_position);
    }
}
