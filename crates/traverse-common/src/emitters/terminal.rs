// Terminal emitter: writes colorized, indented log lines to a writer
// (stdout by default). Grounded in the original `TerminalEmitter`, which
// wrapped `SimpleLogEmitter` and wrote to `sys.stdout`.

use super::simple_log::SimpleLogState;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Write};
use traverse_sdk::{Emitter, LogLevel, TaskHandle};

pub struct TerminalEmitter {
    state: SimpleLogState,
    out: Mutex<Box<dyn Write + Send>>,
    flush_every_write: bool,
    seen_tasks: Mutex<Vec<String>>,
}

impl TerminalEmitter {
    /// A terminal emitter writing to stdout with color enabled.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), true, true)
    }

    pub fn new(out: Box<dyn Write + Send>, use_color: bool, flush_every_write: bool) -> Self {
        Self {
            state: SimpleLogState::new(use_color),
            out: Mutex::new(out),
            flush_every_write,
            seen_tasks: Mutex::new(Vec::new()),
        }
    }

    fn emit(&self, line: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{line}");
        if self.flush_every_write {
            let _ = out.flush();
        }
    }
}

impl Emitter for TerminalEmitter {
    fn start_task(&self, task: &dyn TaskHandle) {
        let mut seen = self.seen_tasks.lock();
        if !seen.iter().any(|k| k == task.identity()) {
            seen.push(task.identity().to_string());
        }
    }

    fn subcontext(&self) {
        self.state.subcontext();
    }

    fn pop_subcontext(&self, level: usize) {
        self.state.pop_subcontext(level);
    }

    fn log_message(&self, level: LogLevel, text: &str) {
        for line in self.state.render_lines(level, text) {
            self.emit(&line);
        }
    }

    fn log_response(&self, task: &dyn TaskHandle, payload: &serde_json::Value) {
        let text = format!("{}: {}", task.display(), render_response_as_text(payload));
        for line in self.state.render_lines(LogLevel::Info, &text) {
            self.emit(&line);
        }
    }

    fn log_file(&self, _description: &str, _extension: &str) -> io::Result<File> {
        let path = std::env::temp_dir().join(format!(
            "{}_{}.{}",
            _description,
            std::process::id(),
            _extension
        ));
        File::create(path)
    }

    fn finalize(&self) {
        let mut out = self.out.lock();
        let _ = out.flush();
    }
}

/// Render a response payload the way `RunContext::log_response` does for
/// its callers, before handing it to `log_message`.
pub fn render_response_as_text(payload: &serde_json::Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
